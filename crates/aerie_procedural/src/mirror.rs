//! # Underside Mirror
//!
//! Derives the cave-like underside shell from the finished top surface.
//!
//! Fully surrounded (interior) vertices are pushed below the surface by
//! negating and scaling their height; boundary vertices keep their height so
//! top and bottom meet along the island rim. Winding is reversed so the
//! shell faces outward when seen from below.

use crate::config::UndersideConfig;
use crate::mesh::MeshBuffer;
use crate::prune::CompactedMesh;

/// Builds the underside mesh for a compacted top mesh.
#[must_use]
pub fn mirror_underside(top: &CompactedMesh, config: &UndersideConfig) -> MeshBuffer {
    let vertices = top
        .mesh
        .vertices
        .iter()
        .zip(&top.triangle_counts)
        .map(|(&[x, y, z], &count)| {
            if count >= config.interior_triangle_count {
                [x, y, -z * config.depth_multiplier]
            } else {
                [x, y, z]
            }
        })
        .collect();

    let indices = top
        .mesh
        .indices
        .chunks_exact(3)
        .flat_map(|t| [t[2], t[1], t[0]])
        .collect();

    MeshBuffer { vertices, indices }
}
