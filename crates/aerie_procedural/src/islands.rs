//! # Island Filtering
//!
//! Removes small disconnected specks left behind by pruning.
//!
//! ## Algorithm
//!
//! 1. Key every triangle edge by its unordered vertex pair, packed into one
//!    `u64` (`min << 32 | max`), and sort the `(edge, triangle)` list.
//! 2. Every run of equal keys is one shared edge; all triangles in the run
//!    become neighbors. Neighbors are stored in a flat CSR arena indexed by
//!    triangle ordinal.
//! 3. Walk components with an explicit stack, seeding in ascending triangle
//!    order. Components below the minimum size are dropped.
//! 4. Re-emit surviving triangles component by component, in visit order,
//!    compacting vertices again.

use crate::mesh::MeshBuffer;
use crate::prune::{CompactedMesh, MeshCompactor};

/// Packs an unordered vertex pair into a single key.
#[inline]
#[must_use]
pub const fn edge_key(a: u32, b: u32) -> u64 {
    if a < b {
        ((a as u64) << 32) | b as u64
    } else {
        ((b as u64) << 32) | a as u64
    }
}

/// Triangle adjacency via shared edges, stored as compressed rows.
#[derive(Clone, Debug, Default)]
pub struct TriangleAdjacency {
    /// `offsets[t]..offsets[t + 1]` indexes the neighbors of triangle `t`.
    offsets: Vec<usize>,
    neighbors: Vec<u32>,
}

impl TriangleAdjacency {
    /// Builds the adjacency graph of a mesh.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn build(mesh: &MeshBuffer) -> Self {
        let triangle_count = mesh.triangle_count();

        let mut edges: Vec<(u64, u32)> = Vec::with_capacity(triangle_count * 3);
        for (t, [a, b, c]) in mesh.triangles().enumerate() {
            let t = t as u32;
            edges.push((edge_key(a, b), t));
            edges.push((edge_key(b, c), t));
            edges.push((edge_key(c, a), t));
        }
        edges.sort_unstable();

        // Shared-edge runs -> neighbor pairs (both directions).
        let mut pairs: Vec<(u32, u32)> = Vec::new();
        let mut start = 0;
        while start < edges.len() {
            let key = edges[start].0;
            let mut end = start + 1;
            while end < edges.len() && edges[end].0 == key {
                end += 1;
            }
            for i in start..end {
                for j in start..end {
                    let (ti, tj) = (edges[i].1, edges[j].1);
                    if ti != tj {
                        pairs.push((ti, tj));
                    }
                }
            }
            start = end;
        }
        pairs.sort_unstable();
        pairs.dedup();

        let mut offsets = vec![0usize; triangle_count + 1];
        for &(from, _) in &pairs {
            offsets[from as usize + 1] += 1;
        }
        for t in 0..triangle_count {
            offsets[t + 1] += offsets[t];
        }
        let neighbors = pairs.into_iter().map(|(_, to)| to).collect();

        Self { offsets, neighbors }
    }

    /// Number of triangles (nodes).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// True when the graph has no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Edge-sharing neighbors of a triangle, ascending.
    #[inline]
    #[must_use]
    pub fn neighbors(&self, triangle: u32) -> &[u32] {
        let t = triangle as usize;
        &self.neighbors[self.offsets[t]..self.offsets[t + 1]]
    }

    /// Connected components, in order of their smallest triangle.
    ///
    /// Each component lists its triangles in stack-traversal visit order.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn components(&self) -> Vec<Vec<u32>> {
        let mut visited = vec![false; self.len()];
        let mut stack: Vec<u32> = Vec::new();
        let mut components = Vec::new();

        for seed in 0..self.len() {
            if visited[seed] {
                continue;
            }

            let mut component = Vec::new();
            stack.push(seed as u32);
            while let Some(t) = stack.pop() {
                if visited[t as usize] {
                    continue;
                }
                visited[t as usize] = true;
                component.push(t);

                for &n in self.neighbors(t) {
                    if !visited[n as usize] {
                        stack.push(n);
                    }
                }
            }
            components.push(component);
        }

        components
    }
}

/// Drops every edge-connected component with fewer than `min_triangles`.
///
/// The output is compacted (first-seen vertex order) and carries fresh
/// triangle counts for its own vertex numbering.
///
/// # Panics
///
/// Panics if `mesh` fails [`MeshBuffer::validate_indices`].
#[must_use]
pub fn filter_islands(mesh: &MeshBuffer, min_triangles: usize) -> CompactedMesh {
    debug_assert!(mesh.validate_indices().is_ok(), "malformed mesh");
    let components = TriangleAdjacency::build(mesh).components();
    let mut compactor = MeshCompactor::new(mesh);
    let mut dropped = 0usize;

    for component in &components {
        if component.len() < min_triangles {
            dropped += 1;
            continue;
        }
        for &t in component {
            let base = t as usize * 3;
            compactor.push_triangle([
                mesh.indices[base],
                mesh.indices[base + 1],
                mesh.indices[base + 2],
            ]);
        }
    }

    tracing::trace!(
        "Island filter: {} components, {} below {} triangles",
        components.len(),
        dropped,
        min_triangles
    );

    compactor.finish()
}
