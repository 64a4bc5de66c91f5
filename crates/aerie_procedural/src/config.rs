//! # Terrain Configuration
//!
//! Every tuning constant of the pipeline, loadable from TOML.
//!
//! Missing keys fall back to the defaults below, so a config file only needs
//! the values it changes:
//!
//! ```toml
//! chunk_size = 61
//!
//! [noise]
//! octaves = 8
//!
//! [filter]
//! height_cutoff = 0.6
//! min_island_triangles = 2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};

/// Default chunk edge length in samples.
pub const DEFAULT_CHUNK_SIZE: usize = 121;

/// Largest chunk edge length whose vertex indices fit in `u32`.
pub const MAX_CHUNK_SIZE: usize = 65_535;

/// Fractal noise parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseConfig {
    /// Number of octaves summed per sample.
    pub octaves: u32,
    /// Horizontal scale of the first octave. Non-positive values are coerced
    /// to a tiny epsilon.
    pub scale: f64,
    /// Multiplier applied after the height curve.
    pub amplitude: f64,
    /// Amplitude factor between successive octaves.
    pub persistence: f64,
    /// Frequency factor between successive octaves.
    pub lacunarity: f64,
    /// Upper clamp applied during normalization.
    pub height_ceiling: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 12,
            scale: 100.0,
            amplitude: 75.0,
            persistence: 0.7,
            lacunarity: 1.7,
            // 2^53 - 1
            height_ceiling: 9_007_199_254_740_991.0,
        }
    }
}

/// Post-meshing geometry filters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Triangles with all three vertices below this height are dropped.
    pub height_cutoff: f32,
    /// Islands with fewer triangles are dropped. `None` derives a value from
    /// the chunk size.
    pub min_island_triangles: Option<usize>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            height_cutoff: 0.4,
            min_island_triangles: None,
        }
    }
}

/// Underside mirror parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UndersideConfig {
    /// Vertices referenced by at least this many triangles are interior.
    pub interior_triangle_count: u32,
    /// Interior heights become `-depth_multiplier * height`.
    pub depth_multiplier: f32,
}

impl Default for UndersideConfig {
    fn default() -> Self {
        Self {
            interior_triangle_count: 6,
            depth_multiplier: 3.0,
        }
    }
}

/// Complete generator configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerrainConfig {
    /// Chunk edge length in samples.
    pub chunk_size: usize,
    /// Mesh simplification level. 0 keeps every sample.
    pub lod: u32,
    /// Noise synthesis.
    pub noise: NoiseConfig,
    /// Pruning and island filtering.
    pub filter: FilterConfig,
    /// Underside mirror.
    pub underside: UndersideConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            lod: 0,
            noise: NoiseConfig::default(),
            filter: FilterConfig::default(),
            underside: UndersideConfig::default(),
        }
    }
}

impl TerrainConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::ConfigParse`] on malformed TOML or unknown
    /// keys, or any validation error.
    pub fn from_toml_str(text: &str) -> TerrainResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| TerrainError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::ConfigRead`] if the file cannot be read, or
    /// any error from [`Self::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TerrainError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded terrain config from {}", path.display());
        Ok(config)
    }

    /// Returns a copy with a different chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Mesh stride for the configured LOD: 1 at level 0, else `2 * lod`.
    #[inline]
    #[must_use]
    pub const fn lod_stride(&self) -> usize {
        lod_stride(self.lod)
    }

    /// Effective minimum island size in triangles.
    ///
    /// Without an explicit value this scales with the chunk's triangle
    /// count: `max(2, 2 * (n - 1)^2 / 900)`, i.e. 32 for a 121 chunk.
    #[must_use]
    pub fn min_island_triangles(&self) -> usize {
        self.filter.min_island_triangles.unwrap_or_else(|| {
            let cells = self.chunk_size.saturating_sub(1);
            (2 * cells * cells / 900).max(2)
        })
    }

    /// Checks every value for sanity.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> TerrainResult<()> {
        if !(2..=MAX_CHUNK_SIZE).contains(&self.chunk_size) {
            return Err(TerrainError::InvalidChunkSize {
                size: self.chunk_size,
            });
        }

        let stride = self.lod_stride();
        if (self.chunk_size - 1) % stride != 0 {
            return Err(TerrainError::IndivisibleLod {
                chunk_size: self.chunk_size,
                stride,
            });
        }

        let noise = &self.noise;
        if noise.octaves == 0 {
            return Err(TerrainError::InvalidConfig(
                "noise.octaves must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("noise.scale", noise.scale),
            ("noise.amplitude", noise.amplitude),
            ("noise.persistence", noise.persistence),
            ("noise.lacunarity", noise.lacunarity),
        ] {
            if !value.is_finite() {
                return Err(TerrainError::InvalidConfig(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if noise.persistence <= 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "noise.persistence must be positive, got {}",
                noise.persistence
            )));
        }
        if noise.height_ceiling.is_nan() || noise.height_ceiling < 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "noise.height_ceiling must be non-negative, got {}",
                noise.height_ceiling
            )));
        }

        if self.filter.height_cutoff.is_nan() {
            return Err(TerrainError::InvalidConfig(
                "filter.height_cutoff must be a number".to_string(),
            ));
        }

        if self.underside.interior_triangle_count == 0 {
            return Err(TerrainError::InvalidConfig(
                "underside.interior_triangle_count must be at least 1".to_string(),
            ));
        }
        if !self.underside.depth_multiplier.is_finite() {
            return Err(TerrainError::InvalidConfig(
                "underside.depth_multiplier must be finite".to_string(),
            ));
        }

        Ok(())
    }
}

/// Mesh stride for a LOD level: 1 at level 0, else `2 * lod`.
#[inline]
#[must_use]
pub const fn lod_stride(lod: u32) -> usize {
    if lod == 0 {
        1
    } else {
        lod as usize * 2
    }
}
