//! # Chunk Assembly
//!
//! Runs the whole pipeline for one chunk coordinate:
//!
//! ```text
//! synthesize -> mesh -> prune -> filter islands -> mirror
//! ```
//!
//! ## Placement
//!
//! Neighboring chunks share their border samples, so a chunk's origin in
//! world space is `coord * (chunk_size - 1)`. Mesh vertices are already
//! centered on that origin.
//!
//! ## Concurrency
//!
//! [`ChunkGenerator`] is immutable after construction and every call to
//! [`ChunkGenerator::generate`] allocates its own scratch buffers, so one
//! generator can serve any number of threads without locking.

use crate::config::TerrainConfig;
use crate::error::{TerrainError, TerrainResult};
use crate::islands::filter_islands;
use crate::mesh::{triangulate, MeshBuffer};
use crate::mirror::mirror_underside;
use crate::noise::{GradientNoise, NoiseField, WorldSeed};
use crate::prune::prune_low_triangles;
use crate::synth::{synthesize, HeightGrid};

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks).
    pub x: i32,
    /// Y coordinate (in chunks).
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World-space origin of this chunk.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn world_origin(self, chunk_size: usize) -> (f64, f64) {
        let extent = chunk_size.saturating_sub(1) as f64;
        (f64::from(self.x) * extent, f64::from(self.y) * extent)
    }

    /// The chunk whose origin is nearest to a world position.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn from_world_pos(world_x: f64, world_y: f64, chunk_size: usize) -> Self {
        let extent = chunk_size.saturating_sub(1).max(1) as f64;
        Self {
            x: (world_x / extent).round() as i32,
            y: (world_y / extent).round() as i32,
        }
    }
}

/// Everything produced for one chunk.
///
/// An empty mesh means there is nothing to render there, not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkResult {
    /// Which chunk this is.
    pub coord: ChunkCoord,
    /// Upward-facing terrain surface.
    pub top: MeshBuffer,
    /// Downward-facing underside shell.
    pub bottom: MeshBuffer,
}

impl ChunkResult {
    /// True when neither mesh has any triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.bottom.is_empty()
    }
}

/// Chunk generator for one world.
///
/// Generic over the noise field so tests can substitute a stub.
#[derive(Clone, Debug)]
pub struct ChunkGenerator<N = GradientNoise> {
    seed: WorldSeed,
    config: TerrainConfig,
    noise: N,
}

impl ChunkGenerator<GradientNoise> {
    /// Creates a generator using the standard noise field.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::NonFiniteSeed`] for NaN/infinite seeds, or
    /// any [`TerrainConfig::validate`] error.
    pub fn new(seed: WorldSeed, config: TerrainConfig) -> TerrainResult<Self> {
        Self::with_noise(seed, config, GradientNoise::new())
    }
}

impl<N: NoiseField> ChunkGenerator<N> {
    /// Creates a generator over a custom noise field.
    ///
    /// # Errors
    ///
    /// Same as [`ChunkGenerator::new`].
    pub fn with_noise(seed: WorldSeed, config: TerrainConfig, noise: N) -> TerrainResult<Self> {
        if !seed.is_finite() {
            return Err(TerrainError::NonFiniteSeed);
        }
        config.validate()?;

        tracing::debug!(
            "Chunk generator ready: seed={}, chunk_size={}, octaves={}",
            seed.value(),
            config.chunk_size,
            config.noise.octaves
        );

        Ok(Self {
            seed,
            config,
            noise,
        })
    }

    /// The world seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// The validated configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Synthesizes the normalized height grid of a chunk.
    #[must_use]
    pub fn height_grid(&self, coord: ChunkCoord) -> HeightGrid {
        let (world_x, world_y) = coord.world_origin(self.config.chunk_size);
        synthesize(
            &self.noise,
            self.config.chunk_size,
            world_x,
            world_y,
            self.seed,
            &self.config.noise,
        )
    }

    /// Generates the top and underside meshes of a chunk.
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord) -> ChunkResult {
        let grid = self.height_grid(coord);

        // Stride divisibility was checked in `with_noise`.
        let raw = triangulate(&grid, self.config.lod_stride());
        let pruned = prune_low_triangles(&raw, self.config.filter.height_cutoff);
        let top = filter_islands(&pruned.mesh, self.config.min_island_triangles());
        let bottom = mirror_underside(&top, &self.config.underside);

        tracing::debug!(
            "Generated chunk ({}, {}): {} raw -> {} pruned -> {} kept triangles",
            coord.x,
            coord.y,
            raw.triangle_count(),
            pruned.mesh.triangle_count(),
            top.mesh.triangle_count()
        );

        ChunkResult {
            coord,
            top: top.mesh,
            bottom,
        }
    }
}

/// One-shot generation with default tuning and the given chunk size.
///
/// # Errors
///
/// Returns an input-validation error for a non-finite seed or an
/// unsupported chunk size.
pub fn generate_chunk(
    coord_x: i32,
    coord_y: i32,
    seed: f64,
    chunk_size: usize,
) -> TerrainResult<ChunkResult> {
    let config = TerrainConfig::default().with_chunk_size(chunk_size);
    let generator = ChunkGenerator::new(WorldSeed::new(seed), config)?;
    Ok(generator.generate(ChunkCoord::new(coord_x, coord_y)))
}
