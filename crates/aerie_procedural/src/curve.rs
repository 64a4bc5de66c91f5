//! # Height Response Curve
//!
//! Shapes raw fractal height into a "plateau then rise" profile: low values
//! stay almost flat, high values climb steeply.

/// A 2D cubic Bézier evaluated by its parameter.
///
/// The raw height is used directly as the curve parameter `t` and the y
/// component of the point is the remapped height. `t` is not clamped, so
/// fractal sums above 1 follow the cubic's polynomial continuation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightCurve {
    /// Control points `[p0, p1, p2, p3]` as `(x, y)`.
    pub points: [(f64, f64); 4],
}

impl HeightCurve {
    /// The terrain profile: flat shelf up to ~0.2, then a steep climb to 1.5.
    pub const TERRAIN: Self = Self {
        points: [(0.0, 0.0), (0.1, 0.01), (0.2, 0.01), (1.0, 1.5)],
    };

    /// Evaluates the curve point at parameter `t`.
    #[inline]
    #[must_use]
    pub fn point(&self, t: f64) -> (f64, f64) {
        let [p0, p1, p2, p3] = self.points;
        (
            cubic_bezier(t, p0.0, p1.0, p2.0, p3.0),
            cubic_bezier(t, p0.1, p1.1, p2.1, p3.1),
        )
    }

    /// Remapped height for a raw height.
    #[inline]
    #[must_use]
    pub fn height(&self, raw: f64) -> f64 {
        self.point(raw).1
    }
}

impl Default for HeightCurve {
    fn default() -> Self {
        Self::TERRAIN
    }
}

/// Bernstein form of a 1D cubic Bézier.
#[inline]
fn cubic_bezier(t: f64, p0: f64, p1: f64, p2: f64, p3: f64) -> f64 {
    let k = 1.0 - t;
    k * k * k * p0 + 3.0 * k * k * t * p1 + 3.0 * k * t * t * p2 + t * t * t * p3
}
