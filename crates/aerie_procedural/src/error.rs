//! # Terrain Error Types
//!
//! Everything that can be rejected at the assembly boundary.
//!
//! Generation itself never fails: once a [`crate::ChunkGenerator`] has been
//! built from a validated config and a finite seed, every chunk coordinate
//! produces a result (possibly an empty mesh).

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while validating generator input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TerrainError {
    /// Chunk edge length outside the supported range.
    #[error("invalid chunk size {size}: must be between 2 and 65535 samples")]
    InvalidChunkSize {
        /// The rejected size.
        size: usize,
    },

    /// Seed is NaN or infinite.
    #[error("world seed must be a finite number")]
    NonFiniteSeed,

    /// The LOD stride does not tile the chunk grid.
    #[error("LOD stride {stride} does not divide chunk extent {} evenly", .chunk_size - 1)]
    IndivisibleLod {
        /// Chunk edge length in samples.
        chunk_size: usize,
        /// Simplification stride derived from the LOD level.
        stride: usize,
    },

    /// A tuning value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read.
    #[error("failed to read config {}: {reason}", .path.display())]
    ConfigRead {
        /// Path that was attempted.
        path: PathBuf,
        /// OS error text.
        reason: String,
    },

    /// Config file is not valid TOML for [`crate::TerrainConfig`].
    #[error("failed to parse config: {0}")]
    ConfigParse(String),
}

/// Result type for terrain operations.
pub type TerrainResult<T> = Result<T, TerrainError>;
