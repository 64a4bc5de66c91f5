//! # Mesh Buffers and Grid Meshing
//!
//! ## Buffer Format
//!
//! Plain vertex positions plus a triangle index list, ready for upload:
//!
//! - `vertices`: `[x, y, z]` per vertex, `z` is height (up)
//! - `indices`: three per triangle, counter-clockwise seen from +z
//!
//! Invariant: every index is `< vertex_count()` and `indices.len() % 3 == 0`.

use crate::error::{TerrainError, TerrainResult};
use crate::synth::HeightGrid;

/// Vertex positions plus triangle indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    /// Vertex positions.
    pub vertices: Vec<[f32; 3]>,
    /// Triangle indices, three per triangle.
    pub indices: Vec<u32>,
}

impl MeshBuffer {
    /// Creates an empty mesh.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Creates an empty mesh with room for the given counts.
    #[must_use]
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when there is nothing to render.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Positions as a flat `x, y, z, x, y, z, ...` slice.
    #[inline]
    #[must_use]
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Height (z) of a vertex.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is out of range.
    #[inline]
    #[must_use]
    pub fn height(&self, vertex: u32) -> f32 {
        self.vertices[vertex as usize][2]
    }

    /// Heights of all vertices in order.
    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.vertices.iter().map(|v| v[2])
    }

    /// Triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
    }

    /// Checks the buffer invariants.
    ///
    /// # Errors
    ///
    /// Describes the first violation found.
    pub fn validate_indices(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            ));
        }
        let count = self.vertices.len();
        if let Some((pos, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= count)
        {
            return Err(format!(
                "index {index} at position {pos} out of range for {count} vertices"
            ));
        }
        Ok(())
    }
}

/// Triangulates a height grid.
///
/// Visits every `stride`-th sample along both axes, x outer. Vertex `(x, y)`
/// sits at `(x - (n-1)/2, (n-1)/2 - y, height)` so the mesh is centered on
/// its origin. Each visited sample off the last row and column emits two
/// triangles towards its `+x` and `+y` neighbors.
///
/// # Errors
///
/// Returns [`TerrainError::IndivisibleLod`] if `stride` is zero or does not
/// divide `size - 1`.
pub fn mesh_height_grid(grid: &HeightGrid, stride: usize) -> TerrainResult<MeshBuffer> {
    let size = grid.size();
    if size < 2 || stride == 0 || (size - 1) % stride != 0 {
        return Err(TerrainError::IndivisibleLod {
            chunk_size: size,
            stride,
        });
    }

    Ok(triangulate(grid, stride))
}

/// Triangulation for a stride already known to tile the grid.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub(crate) fn triangulate(grid: &HeightGrid, stride: usize) -> MeshBuffer {
    let size = grid.size();
    let vertices_per_line = (size - 1) / stride + 1;
    let quads_per_line = vertices_per_line - 1;
    let top_left_x = (size - 1) as f64 / -2.0;
    let top_left_y = (size - 1) as f64 / 2.0;

    let mut mesh = MeshBuffer::with_capacity(
        vertices_per_line * vertices_per_line,
        2 * quads_per_line * quads_per_line,
    );

    let line = vertices_per_line as u32;
    let mut vertex_index = 0u32;
    for x in (0..size).step_by(stride) {
        for y in (0..size).step_by(stride) {
            mesh.vertices.push([
                (top_left_x + x as f64) as f32,
                (top_left_y - y as f64) as f32,
                grid.get(x, y) as f32,
            ]);

            if x < size - 1 && y < size - 1 {
                let v = vertex_index;
                mesh.indices.extend_from_slice(&[v, v + line + 1, v + line]);
                mesh.indices.extend_from_slice(&[v + line + 1, v, v + 1]);
            }

            vertex_index += 1;
        }
    }

    mesh
}
