//! # AERIE Procedural Generation
//!
//! Deterministic floating-terrain chunks for an infinite, streamable world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed and coordinate always produce the same bytes
//! 2. **Chunked**: Each chunk is generated independently and shares its
//!    border samples with its neighbors
//! 3. **Pure**: No I/O, no shared state, no rendering dependency
//! 4. **Total**: Validated input never fails; empty meshes are valid output
//!
//! ## Pipeline
//!
//! - `noise`: Hash-gradient noise field
//! - `prng`: Frozen seeded stream for per-octave offsets
//! - `synth` + `curve`: Fractal height grid, response curve, normalization
//! - `mesh`: Height grid -> triangle buffers
//! - `prune`: Drops low triangles, compacts, counts vertex references
//! - `islands`: Drops small edge-connected components
//! - `mirror`: Underside shell from the finished top surface
//! - `chunk`: Ties it all together per chunk coordinate
//!
//! ## Example
//!
//! ```rust
//! use aerie_procedural::{ChunkCoord, ChunkGenerator, TerrainConfig, WorldSeed};
//!
//! let config = TerrainConfig::default().with_chunk_size(33);
//! let generator = ChunkGenerator::new(WorldSeed::new(12345.0), config)?;
//!
//! let chunk = generator.generate(ChunkCoord::new(0, 0));
//! assert!(chunk.top.validate_indices().is_ok());
//! assert_eq!(chunk.top.triangle_count(), chunk.bottom.triangle_count());
//! # Ok::<(), aerie_procedural::TerrainError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod config;
pub mod curve;
pub mod error;
pub mod islands;
pub mod mesh;
pub mod mirror;
pub mod noise;
pub mod prng;
pub mod prune;
pub mod synth;

pub use chunk::{generate_chunk, ChunkCoord, ChunkGenerator, ChunkResult};
pub use config::{FilterConfig, NoiseConfig, TerrainConfig, UndersideConfig, DEFAULT_CHUNK_SIZE};
pub use curve::HeightCurve;
pub use error::{TerrainError, TerrainResult};
pub use islands::{filter_islands, TriangleAdjacency};
pub use mesh::{mesh_height_grid, MeshBuffer};
pub use mirror::mirror_underside;
pub use noise::{GradientNoise, NoiseField, WorldSeed};
pub use prng::SeededRng;
pub use prune::{prune_low_triangles, CompactedMesh};
pub use synth::{synthesize, HeightGrid, OctaveOffsets};
