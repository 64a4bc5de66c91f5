//! # Low-Region Pruning
//!
//! Drops every triangle that is not entirely at or above the height cutoff,
//! then compacts the vertex buffer so only referenced vertices remain.
//!
//! Compaction renumbers vertices densely in first-seen order and counts, per
//! surviving vertex, how many kept triangles reference it. Those counts
//! decide which vertices are interior for the underside mirror.

use crate::mesh::MeshBuffer;

/// Marker for "not yet remapped" in the old -> new index table.
const UNMAPPED: u32 = u32::MAX;

/// A compacted mesh plus per-vertex triangle reference counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompactedMesh {
    /// The compacted geometry.
    pub mesh: MeshBuffer,
    /// Number of triangles referencing each vertex of `mesh`.
    pub triangle_counts: Vec<u32>,
}

impl CompactedMesh {
    /// Triangle reference count of a vertex.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is not a vertex of `mesh`.
    #[inline]
    #[must_use]
    pub fn triangle_count_of(&self, vertex: u32) -> u32 {
        self.triangle_counts[vertex as usize]
    }
}

/// Copies selected triangles of a source mesh into a fresh, dense mesh.
pub(crate) struct MeshCompactor<'a> {
    source: &'a MeshBuffer,
    remap: Vec<u32>,
    out: CompactedMesh,
}

impl<'a> MeshCompactor<'a> {
    pub(crate) fn new(source: &'a MeshBuffer) -> Self {
        Self {
            source,
            remap: vec![UNMAPPED; source.vertex_count()],
            out: CompactedMesh::default(),
        }
    }

    /// Appends one source triangle, remapping its vertices.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn push_triangle(&mut self, triangle: [u32; 3]) {
        for old in triangle {
            let slot = &mut self.remap[old as usize];
            if *slot == UNMAPPED {
                *slot = self.out.mesh.vertices.len() as u32;
                self.out.mesh.vertices.push(self.source.vertices[old as usize]);
                self.out.triangle_counts.push(0);
            }
            let new = *slot;
            self.out.triangle_counts[new as usize] += 1;
            self.out.mesh.indices.push(new);
        }
    }

    pub(crate) fn finish(self) -> CompactedMesh {
        self.out
    }
}

/// Keeps only triangles whose three vertices are all `>= cutoff`.
///
/// Triangle order among kept triangles is preserved.
///
/// # Panics
///
/// Panics if `mesh` fails [`MeshBuffer::validate_indices`]. Buffers from
/// [`crate::mesh_height_grid`] always pass.
#[must_use]
pub fn prune_low_triangles(mesh: &MeshBuffer, cutoff: f32) -> CompactedMesh {
    debug_assert!(mesh.validate_indices().is_ok(), "malformed mesh");
    let mut compactor = MeshCompactor::new(mesh);

    for triangle in mesh.triangles() {
        if triangle.iter().all(|&v| mesh.height(v) >= cutoff) {
            compactor.push_triangle(triangle);
        }
    }

    compactor.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::mesh_height_grid;
    use crate::synth::HeightGrid;

    /// Two triangles sharing an edge, second one partly low.
    fn two_triangles() -> MeshBuffer {
        MeshBuffer {
            vertices: vec![
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
                [1.0, 1.0, 0.1],
            ],
            indices: vec![0, 1, 2, 2, 1, 3],
        }
    }

    #[test]
    fn test_low_triangle_dropped() {
        let pruned = prune_low_triangles(&two_triangles(), 0.5);

        assert_eq!(pruned.mesh.triangle_count(), 1);
        assert_eq!(pruned.mesh.vertex_count(), 3);
        assert_eq!(pruned.mesh.indices, vec![0, 1, 2]);
        assert_eq!(pruned.triangle_counts, vec![1, 1, 1]);
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let pruned = prune_low_triangles(&two_triangles(), 0.1);
        assert_eq!(pruned.mesh.triangle_count(), 2);
        assert_eq!(pruned.triangle_counts, vec![1, 2, 2, 1]);
    }

    #[test]
    fn test_first_seen_renumbering() {
        let mesh = MeshBuffer {
            vertices: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 5.0],
                [2.0, 0.0, 5.0],
                [3.0, 0.0, 5.0],
            ],
            indices: vec![0, 1, 2, 3, 2, 1],
        };
        let pruned = prune_low_triangles(&mesh, 1.0);

        // Vertex 3 is first seen in the only kept triangle.
        assert_eq!(pruned.mesh.indices, vec![0, 1, 2]);
        assert_eq!(pruned.mesh.vertices[0], [3.0, 0.0, 5.0]);
        assert_eq!(pruned.mesh.vertices[1], [2.0, 0.0, 5.0]);
        assert_eq!(pruned.mesh.vertices[2], [1.0, 0.0, 5.0]);
    }

    #[test]
    fn test_everything_pruned_is_empty_not_error() {
        let pruned = prune_low_triangles(&two_triangles(), 10.0);
        assert!(pruned.mesh.is_empty());
        assert_eq!(pruned.mesh.vertex_count(), 0);
        assert!(pruned.triangle_counts.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_index_panics() {
        let mut mesh = two_triangles();
        mesh.indices[5] = 9;
        let _ = prune_low_triangles(&mesh, 0.0);
    }

    #[test]
    fn test_count_lookup_matches_table() {
        let pruned = prune_low_triangles(&two_triangles(), 0.1);
        assert_eq!(pruned.triangle_count_of(0), 1);
        assert_eq!(pruned.triangle_count_of(1), 2);
        assert_eq!(pruned.triangle_count_of(3), 1);
    }

    #[test]
    fn test_flat_grid_interior_counts() {
        let grid = HeightGrid::from_fn(5, |_, _| 1.0);
        let mesh = mesh_height_grid(&grid, 1).unwrap();
        let pruned = prune_low_triangles(&mesh, 0.5);

        assert_eq!(pruned.mesh.triangle_count(), 32);
        assert_eq!(pruned.triangle_counts.iter().sum::<u32>(), 96);
        // 3x3 interior samples are each touched by six triangles.
        assert_eq!(pruned.triangle_counts.iter().filter(|&&c| c == 6).count(), 9);
        assert!(pruned.triangle_counts.iter().all(|&c| c <= 6));
    }

    #[test]
    fn test_surviving_triangles_above_cutoff() {
        let grid = HeightGrid::from_fn(9, |x, y| ((x * 7 + y * 3) % 5) as f64 * 0.25);
        let mesh = mesh_height_grid(&grid, 1).unwrap();
        let pruned = prune_low_triangles(&mesh, 0.5);

        assert!(pruned.mesh.validate_indices().is_ok());
        for tri in pruned.mesh.triangles() {
            for v in tri {
                assert!(pruned.mesh.height(v) >= 0.5);
            }
        }
    }
}
