//! # Octave Synthesis
//!
//! Turns the noise field into a normalized height grid for one chunk.
//!
//! ## Passes
//!
//! 1. Draw every octave offset from the seeded stream (before any sampling,
//!    so the table does not depend on grid size).
//! 2. Raw pass: fractal sum per cell, clamped below at 0, shaped by the
//!    height curve and scaled by the amplitude multiplier.
//! 3. Normalization pass: divide by `max_amplitude / 0.9` where
//!    `max_amplitude` is the sum of `persistence^i`, then clamp to
//!    `[0, height_ceiling]`. The actual min/max of the grid plays no part.

use crate::config::NoiseConfig;
use crate::curve::HeightCurve;
use crate::noise::{NoiseField, WorldSeed};
use crate::prng::SeededRng;

/// Half-width of the range per-octave offsets are drawn from.
pub const OCTAVE_OFFSET_RANGE: f64 = 100_000.0;

/// Scale substituted for non-positive configured scales.
pub const MIN_SCALE: f64 = 0.0001;

/// Square grid of heights, indexed `[x][y]`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    size: usize,
    heights: Vec<f64>,
}

impl HeightGrid {
    /// Creates a zeroed grid.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            heights: vec![0.0; size * size],
        }
    }

    /// Creates a grid from a function of `(x, y)`.
    #[must_use]
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut grid = Self::new(size);
        for x in 0..size {
            for y in 0..size {
                grid.set(x, y, f(x, y));
            }
        }
        grid
    }

    /// Edge length in samples.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Height at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.heights[x * self.size + y]
    }

    /// Sets the height at `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, height: f64) {
        self.heights[x * self.size + y] = height;
    }

    /// All heights, x-major.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.heights
    }
}

/// Per-octave sample offsets for one chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct OctaveOffsets {
    offsets: Vec<(f64, f64)>,
    /// Sum of the amplitudes of all octaves.
    pub max_amplitude: f64,
}

impl OctaveOffsets {
    /// Draws the offset table for a chunk at the given world offset.
    ///
    /// The world x offset is added and the world y offset subtracted; chunk
    /// y grows opposite to sample y.
    #[must_use]
    pub fn draw(seed: WorldSeed, noise: &NoiseConfig, world_x: f64, world_y: f64) -> Self {
        let mut rng = SeededRng::new(seed);
        let mut offsets = Vec::with_capacity(noise.octaves as usize);
        let mut max_amplitude = 0.0;
        let mut amplitude = 1.0;

        for _ in 0..noise.octaves {
            let ox = rng.next_range(-OCTAVE_OFFSET_RANGE, OCTAVE_OFFSET_RANGE) + world_x;
            let oy = rng.next_range(-OCTAVE_OFFSET_RANGE, OCTAVE_OFFSET_RANGE) - world_y;
            offsets.push((ox, oy));

            max_amplitude += amplitude;
            amplitude *= noise.persistence;
        }

        Self {
            offsets,
            max_amplitude,
        }
    }

    /// The `(x, y)` offsets, one per octave.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.offsets
    }
}

/// Synthesizes the normalized height grid for one chunk.
///
/// `world_x`/`world_y` is the chunk origin in world units.
#[must_use]
pub fn synthesize<N: NoiseField + ?Sized>(
    field: &N,
    size: usize,
    world_x: f64,
    world_y: f64,
    seed: WorldSeed,
    noise: &NoiseConfig,
) -> HeightGrid {
    let octaves = OctaveOffsets::draw(seed, noise, world_x, world_y);
    let curve = HeightCurve::TERRAIN;

    let scale = if noise.scale <= 0.0 { MIN_SCALE } else { noise.scale };
    #[allow(clippy::cast_precision_loss)]
    let half = size as f64 / 2.0;

    // Raw pass
    let mut grid = HeightGrid::new(size);
    for y in 0..size {
        #[allow(clippy::cast_precision_loss)]
        let fy = y as f64 - half;
        for x in 0..size {
            #[allow(clippy::cast_precision_loss)]
            let fx = x as f64 - half;

            let mut amplitude = 1.0;
            let mut frequency = 1.0;
            let mut height = 0.0;

            for &(ox, oy) in octaves.as_slice() {
                let sample_x = (fx + ox) / scale * frequency;
                let sample_y = (fy + oy) / scale * frequency;

                height += (field.sample(sample_x, sample_y) * 2.0 - 1.0) * amplitude;

                amplitude *= noise.persistence;
                frequency *= noise.lacunarity;
            }

            if height < 0.0 {
                height = 0.0;
            }

            grid.set(x, y, curve.height(height) * noise.amplitude);
        }
    }

    // Normalization pass. A negative or NaN ceiling collapses to 0.
    let divisor = octaves.max_amplitude / 0.9;
    let ceiling = noise.height_ceiling.max(0.0);
    for h in &mut grid.heights {
        *h = ((*h + 1.0) / divisor).clamp(0.0, ceiling);
    }

    grid
}
