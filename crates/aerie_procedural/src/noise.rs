//! # Gradient Noise Field
//!
//! The basic signal source for terrain synthesis.
//!
//! ## Why no seed here?
//!
//! The field itself is fixed: every lattice point gets its gradient from an
//! integer hash of its coordinates. Seed-dependent variation comes entirely
//! from the per-octave offsets drawn in [`crate::synth`], which move each
//! octave to a different region of this one infinite field.
//!
//! ## Determinism Guarantee
//!
//! Lattice hashing is done with wrapping 32-bit integer arithmetic and the
//! rest is plain IEEE double math, so a given `(x, y)` yields the same bits
//! on any platform, independent of call order.

use std::f64::consts::TAU;

/// World seed for deterministic generation.
///
/// Any finite number identifies one terrain instance. Validation happens at
/// the assembly boundary; see [`crate::ChunkGenerator::new`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldSeed(f64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: f64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns true if the seed can drive generation.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(1337.0)
    }
}

impl From<u32> for WorldSeed {
    fn from(value: u32) -> Self {
        Self(f64::from(value))
    }
}

/// A 2D coherent noise source sampled by the octave synthesizer.
///
/// Implementations must be pure: the same input always returns the same
/// output, and sampling must be safe from many threads at once.
pub trait NoiseField: Send + Sync {
    /// Samples the field. The result should lie in `[0, 1]`.
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Hash-gradient noise with quintic (smootherstep) interpolation.
///
/// Output is continuous with continuous first and second derivatives, and
/// is exactly `0.5` on every integer lattice point.
///
/// # Example
///
/// ```rust
/// use aerie_procedural::noise::{GradientNoise, NoiseField};
///
/// let noise = GradientNoise::new();
/// let value = noise.sample(100.5, 200.3);
/// assert!((0.0..=1.0).contains(&value));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct GradientNoise;

impl GradientNoise {
    /// Multiplier applied to the lattice x coordinate before mixing.
    const HASH_X: i32 = 374_761_393;
    /// Multiplier applied to the lattice y coordinate before mixing.
    const HASH_Y: i32 = 668_265_263;
    /// Final avalanche multiplier.
    const HASH_MIX: i32 = 1_274_126_177;

    /// Creates the noise field.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Hashes a lattice point to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn hash(ix: i32, iy: i32) -> f64 {
        let seed = ix
            .wrapping_mul(Self::HASH_X)
            .wrapping_add(iy.wrapping_mul(Self::HASH_Y));
        let mixed = (seed ^ (seed >> 13)).wrapping_mul(Self::HASH_MIX);
        f64::from(mixed & 0x7fff_ffff) / f64::from(0x7fff_ffff)
    }

    /// Unit gradient vector for a lattice point.
    #[inline]
    #[must_use]
    pub fn gradient(ix: i32, iy: i32) -> (f64, f64) {
        let angle = Self::hash(ix, iy) * TAU;
        (angle.cos(), angle.sin())
    }

    /// Dot product of a lattice gradient with the offset to `(x, y)`.
    #[inline]
    fn dot_grid_gradient(ix: f64, iy: f64, x: f64, y: f64) -> f64 {
        let (gx, gy) = Self::gradient(lattice(ix), lattice(iy));
        (x - ix) * gx + (y - iy) * gy
    }
}

impl NoiseField for GradientNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let x1 = x0 + 1.0;
        let y0 = y.floor();
        let y1 = y0 + 1.0;

        let sx = fade(x - x0);
        let sy = fade(y - y0);

        let n0 = Self::dot_grid_gradient(x0, y0, x, y);
        let n1 = Self::dot_grid_gradient(x1, y0, x, y);
        let ix0 = lerp(n0, n1, sx);

        let n2 = Self::dot_grid_gradient(x0, y1, x, y);
        let n3 = Self::dot_grid_gradient(x1, y1, x, y);
        let ix1 = lerp(n2, n3, sx);

        (lerp(ix0, ix1, sy) + 1.0) / 2.0
    }
}

/// Smootherstep weight `t³(t(6t − 15) + 10)`.
#[inline]
#[must_use]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Linear interpolation from `a` to `b`.
#[inline]
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Wraps an already-floored coordinate onto the 32-bit lattice.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn lattice(v: f64) -> i32 {
    // Saturating float->int, then wrap. Sample coordinates stay far inside
    // the i64 range for any sane world.
    (v as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let noise1 = GradientNoise::new();
        let noise2 = GradientNoise::new();

        for i in 0..100 {
            let x = f64::from(i) * 0.1;
            let y = f64::from(i) * 0.17;
            assert_eq!(
                noise1.sample(x, y).to_bits(),
                noise2.sample(x, y).to_bits(),
                "Noise should be deterministic"
            );
        }
    }

    #[test]
    fn test_hash_is_order_independent() {
        let forward: Vec<f64> = (0..32).map(|i| GradientNoise::hash(i, -i)).collect();
        let backward: Vec<f64> = (0..32).rev().map(|i| GradientNoise::hash(i, -i)).collect();

        for (a, b) in forward.iter().zip(backward.iter().rev()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_hash_range() {
        for ix in -50..50 {
            for iy in -50..50 {
                let h = GradientNoise::hash(ix, iy);
                assert!((0.0..=1.0).contains(&h), "hash {h} out of range");
            }
        }
    }

    #[test]
    fn test_hash_known_values() {
        assert_eq!(GradientNoise::hash(0, 0), 0.0);
        assert_eq!(GradientNoise::hash(1, 0), 0.016_264_409_765_724_283);
        assert_eq!(GradientNoise::hash(0, 1), 0.536_541_048_687_203_3);
        assert_eq!(GradientNoise::hash(1, 1), 0.327_714_857_797_936_9);
        assert_eq!(GradientNoise::hash(-1, -1), 0.882_219_362_017_800_7);
        assert_eq!(GradientNoise::hash(17, -42), 0.055_582_028_373_881_26);
    }

    #[test]
    fn test_sample_known_values() {
        let noise = GradientNoise::new();
        let cases = [
            ((0.5, 0.5), 0.434_190_280_772_306_26),
            ((100.5, 200.3), 0.462_505_763_522_401_5),
            ((-3.25, 7.75), 0.448_491_408_756_832_35),
        ];

        for ((x, y), expected) in cases {
            let value = noise.sample(x, y);
            assert!((value - expected).abs() < 1e-12, "({x}, {y}): {value}");
        }
    }

    #[test]
    fn test_hash_extreme_lattice_does_not_panic() {
        let _ = GradientNoise::hash(i32::MAX, i32::MIN);
        let _ = GradientNoise::hash(i32::MIN, i32::MAX);
    }

    #[test]
    fn test_gradient_is_unit_length() {
        for ix in -20..20 {
            let (gx, gy) = GradientNoise::gradient(ix, ix * 3 + 1);
            let len = (gx * gx + gy * gy).sqrt();
            assert!((len - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_range() {
        let noise = GradientNoise::new();

        for i in 0..10_000 {
            let x = (f64::from(i) * 0.1) - 500.0;
            let y = (f64::from(i) * 0.13) - 650.0;
            let value = noise.sample(x, y);

            assert!(
                (0.0..=1.0).contains(&value),
                "Value {value} out of range at ({x}, {y})"
            );
        }
    }

    #[test]
    fn test_lattice_points_are_midpoint() {
        let noise = GradientNoise::new();
        for (x, y) in [(0.0, 0.0), (3.0, 5.0), (-7.0, 12.0), (1000.0, -1000.0)] {
            assert_eq!(noise.sample(x, y), 0.5);
        }
    }

    #[test]
    fn test_continuity() {
        let noise = GradientNoise::new();

        for &(x, y) in &[(100.0, 100.0), (3.25, -7.5), (-41.9, 0.33)] {
            for eps in [1e-3, 1e-5, 1e-7] {
                let v = noise.sample(x, y);
                let dx = (v - noise.sample(x + eps, y)).abs();
                let dy = (v - noise.sample(x, y + eps)).abs();

                // |grad| <= (1 + 1.875 * 2√2) / 2 for unit lattice gradients.
                assert!(dx < 4.0 * eps, "x step {eps}: diff = {dx}");
                assert!(dy < 4.0 * eps, "y step {eps}: diff = {dy}");
            }
        }
    }

    #[test]
    fn test_continuity_across_lattice_lines() {
        let noise = GradientNoise::new();
        let eps = 1e-9;

        for ix in -3..3 {
            let x = f64::from(ix);
            let left = noise.sample(x - eps, 0.37);
            let right = noise.sample(x + eps, 0.37);
            assert!((left - right).abs() < 1e-7, "jump at x = {x}");
        }
    }

    #[test]
    fn test_fade_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert_eq!(fade(0.5), 0.5);
    }

    #[test]
    fn test_seed_from_u32() {
        assert_eq!(WorldSeed::from(42u32).value(), 42.0);
        assert!(WorldSeed::default().is_finite());
        assert!(!WorldSeed::new(f64::NAN).is_finite());
    }
}
