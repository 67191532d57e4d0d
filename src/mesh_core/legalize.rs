use log::trace;

use super::handles::FixedVertexHandle;
use super::math;
use super::storage::MeshStorage;
use super::storage_operations;
use crate::{HasPosition, MeshError};

/// An edge that may violate the Delaunay property, identified by its two end points.
///
/// Identifying edges by their vertices instead of their triangles makes entries robust
/// against triangles that were retired by an earlier flip.
pub type EdgeCandidate = (FixedVertexHandle, FixedVertexHandle);

/// Upper bound for worklist entries processed by a single call to [legalize_edges].
fn iteration_limit(num_triangles: usize) -> usize {
    32 * (num_triangles + 8)
}

/// Restores the Delaunay property by flipping edges until no candidate is left.
///
/// Each flip pushes the four outer edges of the flipped quad as new candidates. Returns the
/// number of performed flips.
///
/// ```text
///         w                 w
///        /|\               / \
///       / | \             /   \
///      p  |  q   ===>    p-----q
///       \ | /             \   /
///        \|/               \ /
///         u                 u
/// ```
/// The edge `u - w` is flipped if `q` lies inside the circumcircle of `(u, w, p)`.
pub fn legalize_edges<V: HasPosition>(
    storage: &mut MeshStorage<V>,
    edges: &mut Vec<EdgeCandidate>,
) -> Result<usize, MeshError> {
    let limit = iteration_limit(storage.num_triangles());
    let mut iterations = 0;
    let mut flips = 0;

    while let Some((from, to)) = edges.pop() {
        iterations += 1;
        if iterations > limit {
            return Err(MeshError::FlipNonTermination { iterations });
        }

        let Some((triangle, opposite)) = storage.find_edge(from, to) else {
            // The edge was removed by a previous flip
            continue;
        };
        let entry = *storage.triangle_entry(triangle);
        let Some(other) = entry.neighbors[opposite] else {
            // Boundary edges are always legal
            continue;
        };
        let other_entry = storage.triangle_entry(other);
        let Some(other_opposite) = other_entry.edge_index_towards(&entry) else {
            continue;
        };

        let p = entry.vertices[opposite];
        let q = other_entry.vertices[other_opposite];
        let should_flip = math::contained_in_circumference(
            storage.position(from),
            storage.position(to),
            storage.position(p),
            storage.position(q),
        );

        if should_flip {
            trace!(
                "flipping edge {} - {} to {} - {}",
                from.index(),
                to.index(),
                p.index(),
                q.index()
            );
            storage_operations::flip(storage, triangle, opposite);
            flips += 1;
            edges.push((from, q));
            edges.push((q, to));
            edges.push((to, p));
            edges.push((p, from));
        }
    }
    Ok(flips)
}
