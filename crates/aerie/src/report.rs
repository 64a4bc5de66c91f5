//! # Chunk Statistics

use std::fmt;

use aerie_procedural::{ChunkCoord, ChunkResult, MeshBuffer};

/// Summary of one generated chunk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkStats {
    /// Which chunk.
    pub coord: ChunkCoord,
    /// Top surface vertices.
    pub vertices: usize,
    /// Top surface triangles (the underside has the same count).
    pub triangles: usize,
    /// Top surface height range, `None` when empty.
    pub top_range: Option<(f32, f32)>,
    /// Underside height range, `None` when empty.
    pub bottom_range: Option<(f32, f32)>,
}

impl ChunkStats {
    /// Collects statistics for a chunk.
    #[must_use]
    pub fn from_chunk(chunk: &ChunkResult) -> Self {
        Self {
            coord: chunk.coord,
            vertices: chunk.top.vertex_count(),
            triangles: chunk.top.triangle_count(),
            top_range: height_range(&chunk.top),
            bottom_range: height_range(&chunk.bottom),
        }
    }

    /// True if the chunk has nothing to render.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.triangles == 0
    }
}

impl fmt::Display for ChunkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:>4}, {:>4})  ", self.coord.x, self.coord.y)?;
        match (self.top_range, self.bottom_range) {
            (Some((top_lo, top_hi)), Some((bottom_lo, _))) => write!(
                f,
                "{:>7} verts {:>7} tris  top {top_lo:>8.3}..{top_hi:>8.3}  depth {bottom_lo:>9.3}",
                self.vertices, self.triangles
            ),
            _ => write!(f, "empty"),
        }
    }
}

/// Smallest and largest vertex height of a mesh.
#[must_use]
pub fn height_range(mesh: &MeshBuffer) -> Option<(f32, f32)> {
    mesh.heights().fold(None, |range, h| match range {
        None => Some((h, h)),
        Some((lo, hi)) => Some((lo.min(h), hi.max(h))),
    })
}
