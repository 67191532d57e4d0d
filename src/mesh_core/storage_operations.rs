//! Low level operations that mutate the triangle graph of a [MeshStorage].
//!
//! These functions keep the incidence sets and neighbor links symmetric but do not check any
//! geometric property; callers are responsible for passing counterclockwise corners.

use super::handles::{FixedTriangleHandle, FixedVertexHandle};
use super::storage::{MeshStorage, TriangleEntry};

/// Creates a new triangle without any neighbors and registers it with its corners.
pub fn create_triangle<V>(
    storage: &mut MeshStorage<V>,
    vertices: [FixedVertexHandle; 3],
) -> FixedTriangleHandle {
    let entry = Some(TriangleEntry::new(vertices));
    let handle = if let Some(free) = storage.free_triangles.pop() {
        storage.triangles[free.index()] = entry;
        free
    } else {
        storage.triangles.push(entry);
        FixedTriangleHandle::new(storage.triangles.len() - 1)
    };

    for vertex in vertices {
        storage.vertices[vertex.index()].triangles.push(handle);
    }
    handle
}

/// Removes a triangle from the graph.
///
/// The triangle is detached from its corners' incidence sets and from all of its neighbors.
/// Its slot is recycled. Returns the removed entry.
pub fn retire_triangle<V>(
    storage: &mut MeshStorage<V>,
    handle: FixedTriangleHandle,
) -> TriangleEntry {
    let entry = storage.triangles[handle.index()]
        .take()
        .expect("Triangle was retired twice. This is a bug in shull.");

    for vertex in entry.vertices {
        storage.vertices[vertex.index()]
            .triangles
            .retain(|triangle| *triangle != handle);
    }

    for neighbor in entry.neighbors.into_iter().flatten() {
        let neighbor_entry = storage.triangle_entry_mut(neighbor);
        for slot in &mut neighbor_entry.neighbors {
            if *slot == Some(handle) {
                *slot = None;
            }
        }
    }

    storage.free_triangles.push(handle);
    entry
}

/// Marks two triangles as neighbors across their shared edge.
///
/// Does nothing if `other` is `None`.
pub fn link<V>(
    storage: &mut MeshStorage<V>,
    triangle: FixedTriangleHandle,
    other: Option<FixedTriangleHandle>,
) {
    let Some(other) = other else {
        return;
    };

    let entry = *storage.triangle_entry(triangle);
    let other_entry = *storage.triangle_entry(other);
    let index = entry.edge_index_towards(&other_entry);
    let other_index = other_entry.edge_index_towards(&entry);

    if let (Some(index), Some(other_index)) = (index, other_index) {
        storage.triangle_entry_mut(triangle).neighbors[index] = Some(other);
        storage.triangle_entry_mut(other).neighbors[other_index] = Some(triangle);
    } else {
        panic!("Linked triangles without a shared edge. This is a bug in shull.");
    }
}

/// Flips the edge opposite to corner `opposite` of `handle`.
///
/// ```text
///          w                      w
///        / | \                  /   \
///       /  |  \                / t1  \
///      p   |   q     ===>     p ----- q
///       \  |  /                \ t0  /
///        \ | /                  \   /
///          u                      u
/// ```
///
/// Both old triangles are retired. Returns the two new triangles `(u, q, p)` and `(q, w, p)`.
/// The quad `u, q, w, p` must be strictly convex.
pub fn flip<V>(
    storage: &mut MeshStorage<V>,
    handle: FixedTriangleHandle,
    opposite: usize,
) -> [FixedTriangleHandle; 2] {
    let entry = *storage.triangle_entry(handle);
    let other = entry.neighbors[opposite].expect("Cannot flip a boundary edge");
    let other_entry = *storage.triangle_entry(other);

    let p = entry.vertices[opposite];
    let u = entry.vertices[(opposite + 1) % 3];
    let w = entry.vertices[(opposite + 2) % 3];
    let other_opposite = other_entry
        .edge_index_towards(&entry)
        .expect("Flipped triangles must share an edge");
    let q = other_entry.vertices[other_opposite];

    // Outer edges of the quad, named by their endpoints
    let n_pu = entry.neighbors[(opposite + 2) % 3];
    let n_wp = entry.neighbors[(opposite + 1) % 3];
    let other_w = other_entry
        .corner_index(w)
        .expect("Flipped triangles must share an edge");
    let other_u = other_entry
        .corner_index(u)
        .expect("Flipped triangles must share an edge");
    let n_uq = other_entry.neighbors[other_w];
    let n_qw = other_entry.neighbors[other_u];

    retire_triangle(storage, handle);
    retire_triangle(storage, other);

    let t0 = create_triangle(storage, [u, q, p]);
    let t1 = create_triangle(storage, [q, w, p]);
    link(storage, t0, Some(t1));
    link(storage, t0, n_pu);
    link(storage, t0, n_uq);
    link(storage, t1, n_wp);
    link(storage, t1, n_qw);
    [t0, t1]
}

/// Splits a triangle at a new vertex lying on its edge opposite to corner `opposite`.
///
/// The split edge must be a boundary edge. Returns the two new triangles.
pub fn split_boundary_edge<V>(
    storage: &mut MeshStorage<V>,
    handle: FixedTriangleHandle,
    opposite: usize,
    new_vertex: FixedVertexHandle,
) -> [FixedTriangleHandle; 2] {
    let entry = *storage.triangle_entry(handle);
    debug_assert!(entry.neighbors[opposite].is_none());

    let c = entry.vertices[opposite];
    let a = entry.vertices[(opposite + 1) % 3];
    let b = entry.vertices[(opposite + 2) % 3];
    let n_bc = entry.neighbors[(opposite + 1) % 3];
    let n_ca = entry.neighbors[(opposite + 2) % 3];

    retire_triangle(storage, handle);

    let t0 = create_triangle(storage, [a, new_vertex, c]);
    let t1 = create_triangle(storage, [new_vertex, b, c]);
    link(storage, t0, Some(t1));
    link(storage, t0, n_ca);
    link(storage, t1, n_bc);
    [t0, t1]
}

/// Splits a triangle into three at a new vertex lying strictly inside of it.
pub fn split_triangle<V>(
    storage: &mut MeshStorage<V>,
    handle: FixedTriangleHandle,
    new_vertex: FixedVertexHandle,
) -> [FixedTriangleHandle; 3] {
    let entry = retire_triangle(storage, handle);
    let [a, b, c] = entry.vertices;
    let [n_bc, n_ca, n_ab] = entry.neighbors;

    let t0 = create_triangle(storage, [a, b, new_vertex]);
    let t1 = create_triangle(storage, [b, c, new_vertex]);
    let t2 = create_triangle(storage, [c, a, new_vertex]);
    link(storage, t0, Some(t1));
    link(storage, t1, Some(t2));
    link(storage, t2, Some(t0));
    link(storage, t0, n_ab);
    link(storage, t1, n_bc);
    link(storage, t2, n_ca);
    [t0, t1, t2]
}

/// Splits the two triangles sharing the edge opposite to corner `opposite` of `handle` at a
/// new vertex lying on that edge.
///
/// ```text
///          c                      c
///        /   \                  / | \
///       a-----b      ===>       a--p--b
///        \   /                  \ | /
///          d                      d
/// ```
pub fn split_inner_edge<V>(
    storage: &mut MeshStorage<V>,
    handle: FixedTriangleHandle,
    opposite: usize,
    new_vertex: FixedVertexHandle,
) -> [FixedTriangleHandle; 4] {
    let entry = *storage.triangle_entry(handle);
    let other = entry.neighbors[opposite].expect("Cannot split a boundary edge as inner edge");
    let other_entry = *storage.triangle_entry(other);

    let c = entry.vertices[opposite];
    let a = entry.vertices[(opposite + 1) % 3];
    let b = entry.vertices[(opposite + 2) % 3];
    let other_opposite = other_entry
        .edge_index_towards(&entry)
        .expect("Split triangles must share an edge");
    let d = other_entry.vertices[other_opposite];

    let n_bc = entry.neighbors[(opposite + 1) % 3];
    let n_ca = entry.neighbors[(opposite + 2) % 3];
    let other_a = other_entry
        .corner_index(a)
        .expect("Split triangles must share an edge");
    let other_b = other_entry
        .corner_index(b)
        .expect("Split triangles must share an edge");
    let n_db = other_entry.neighbors[other_a];
    let n_ad = other_entry.neighbors[other_b];

    retire_triangle(storage, handle);
    retire_triangle(storage, other);

    let t0 = create_triangle(storage, [a, new_vertex, c]);
    let t1 = create_triangle(storage, [new_vertex, b, c]);
    let t2 = create_triangle(storage, [b, new_vertex, d]);
    let t3 = create_triangle(storage, [new_vertex, a, d]);
    link(storage, t0, Some(t1));
    link(storage, t1, Some(t2));
    link(storage, t2, Some(t3));
    link(storage, t3, Some(t0));
    link(storage, t0, n_ca);
    link(storage, t1, n_bc);
    link(storage, t2, n_db);
    link(storage, t3, n_ad);
    [t0, t1, t2, t3]
}

#[cfg(test)]
mod test {
    use super::{
        create_triangle, flip, link, retire_triangle, split_boundary_edge, split_inner_edge,
        split_triangle,
    };
    use crate::mesh_core::storage::MeshStorage;
    use crate::Point2;

    fn quad_storage() -> MeshStorage<Point2<f64>> {
        let mut storage = MeshStorage::default();
        for position in [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ] {
            storage.push_vertex(position);
        }
        storage
    }

    #[test]
    fn test_create_and_link() {
        let mut storage = quad_storage();
        let v: Vec<_> = storage.fixed_vertices().collect();
        let t0 = create_triangle(&mut storage, [v[0], v[1], v[2]]);
        let t1 = create_triangle(&mut storage, [v[0], v[2], v[3]]);
        link(&mut storage, t0, Some(t1));

        assert_eq!(storage.num_triangles(), 2);
        assert_eq!(storage.triangle_entry(t0).neighbors, [None, Some(t1), None]);
        assert_eq!(storage.triangle_entry(t1).neighbors, [None, None, Some(t0)]);
        assert_eq!(storage.find_edge(v[0], v[2]), Some((t1, 2)));
        assert_eq!(storage.find_edge(v[2], v[0]), Some((t0, 1)));
        storage.sanity_check();
    }

    #[test]
    fn test_retire_recycles_slot() {
        let mut storage = quad_storage();
        let v: Vec<_> = storage.fixed_vertices().collect();
        let t0 = create_triangle(&mut storage, [v[0], v[1], v[2]]);
        let t1 = create_triangle(&mut storage, [v[0], v[2], v[3]]);
        link(&mut storage, t0, Some(t1));

        let removed = retire_triangle(&mut storage, t0);
        assert_eq!(removed.vertices, [v[0], v[1], v[2]]);
        assert_eq!(storage.num_triangles(), 1);
        assert_eq!(storage.triangle_entry(t1).neighbors, [None, None, None]);
        assert!(storage.incident_triangles(v[1]).is_empty());
        storage.sanity_check();

        let t2 = create_triangle(&mut storage, [v[0], v[1], v[2]]);
        assert_eq!(t2, t0);
        assert_eq!(storage.num_triangles(), 2);
    }

    #[test]
    fn test_flip() {
        let mut storage = quad_storage();
        let v: Vec<_> = storage.fixed_vertices().collect();
        let t0 = create_triangle(&mut storage, [v[0], v[1], v[2]]);
        let t1 = create_triangle(&mut storage, [v[0], v[2], v[3]]);
        link(&mut storage, t0, Some(t1));

        // Corner 1 of t0 is opposite to the diagonal v0 - v2
        let [n0, n1] = flip(&mut storage, t0, 1);
        assert_eq!(storage.num_triangles(), 2);
        assert!(storage.find_edge(v[0], v[2]).is_none());
        assert!(storage.find_edge(v[1], v[3]).is_some());
        assert!(storage.find_edge(v[3], v[1]).is_some());
        assert_eq!(
            storage.triangle_entry(n0).edge_index_towards(storage.triangle_entry(n1)),
            Some(0)
        );
        storage.sanity_check();
    }

    #[test]
    fn test_split_boundary_edge() {
        let mut storage = quad_storage();
        let v: Vec<_> = storage.fixed_vertices().collect();
        let t0 = create_triangle(&mut storage, [v[0], v[1], v[3]]);
        let middle = storage.push_vertex(Point2::new(0.5, 0.0));

        split_boundary_edge(&mut storage, t0, 2, middle);
        assert_eq!(storage.num_triangles(), 2);
        assert!(storage.find_edge(v[0], middle).is_some());
        assert!(storage.find_edge(middle, v[1]).is_some());
        assert_eq!(storage.incident_triangles(middle).len(), 2);
        storage.sanity_check();
    }

    #[test]
    fn test_split_triangle() {
        let mut storage = quad_storage();
        let v: Vec<_> = storage.fixed_vertices().collect();
        let t0 = create_triangle(&mut storage, [v[0], v[1], v[2]]);
        let t1 = create_triangle(&mut storage, [v[0], v[2], v[3]]);
        link(&mut storage, t0, Some(t1));
        let inner = storage.push_vertex(Point2::new(0.6, 0.3));

        split_triangle(&mut storage, t0, inner);
        assert_eq!(storage.num_triangles(), 4);
        assert_eq!(storage.incident_triangles(inner).len(), 3);
        // The diagonal is still shared with t1
        let (owner, opposite) = storage.find_edge(v[2], v[0]).unwrap();
        assert_eq!(storage.triangle_entry(owner).neighbors[opposite], Some(t1));
        storage.sanity_check();
    }

    #[test]
    fn test_split_inner_edge() {
        let mut storage = quad_storage();
        let v: Vec<_> = storage.fixed_vertices().collect();
        let t0 = create_triangle(&mut storage, [v[0], v[1], v[2]]);
        let t1 = create_triangle(&mut storage, [v[0], v[2], v[3]]);
        link(&mut storage, t0, Some(t1));
        let middle = storage.push_vertex(Point2::new(0.5, 0.5));

        split_inner_edge(&mut storage, t0, 1, middle);
        assert_eq!(storage.num_triangles(), 4);
        assert_eq!(storage.incident_triangles(middle).len(), 4);
        assert!(storage.find_edge(v[0], v[2]).is_none());
        for corner in &v {
            assert!(storage.find_edge(middle, *corner).is_some());
            assert!(storage.find_edge(*corner, middle).is_some());
        }
        storage.sanity_check();
    }
}
