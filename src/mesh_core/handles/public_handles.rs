use smallvec::SmallVec;

use super::{FixedTriangleHandle, FixedVertexHandle};
use crate::mesh_core::math;
use crate::mesh_core::storage::MeshStorage;
use crate::{HasPosition, Point2};

/// Handle to a vertex of a mesh.
///
/// Dynamic handles borrow the mesh they were created from. Use [VertexHandle::fix] to
/// obtain a [FixedVertexHandle] that can be stored without borrowing.
pub struct VertexHandle<'a, V> {
    storage: &'a MeshStorage<V>,
    handle: FixedVertexHandle,
}

/// Handle to a triangle of a mesh.
///
/// The triangle's corners are always ordered counterclockwise.
pub struct TriangleHandle<'a, V> {
    storage: &'a MeshStorage<V>,
    handle: FixedTriangleHandle,
}

impl<'a, V> Clone for VertexHandle<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, V> Copy for VertexHandle<'a, V> {}

impl<'a, V> Clone for TriangleHandle<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, V> Copy for TriangleHandle<'a, V> {}

impl<'a, V> PartialEq for VertexHandle<'a, V> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<'a, V> Eq for VertexHandle<'a, V> {}

impl<'a, V> PartialEq for TriangleHandle<'a, V> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<'a, V> Eq for TriangleHandle<'a, V> {}

impl<'a, V> std::fmt::Debug for VertexHandle<'a, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VertexHandle({:?})", self.handle.index())
    }
}

impl<'a, V> std::fmt::Debug for TriangleHandle<'a, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TriangleHandle({:?})", self.handle.index())
    }
}

impl<'a, V> VertexHandle<'a, V> {
    pub(crate) fn new(storage: &'a MeshStorage<V>, handle: FixedVertexHandle) -> Self {
        Self { storage, handle }
    }

    /// Converts this dynamic handle into a fixed handle.
    pub fn fix(&self) -> FixedVertexHandle {
        self.handle
    }

    /// Returns the data that was inserted for this vertex.
    pub fn data(&self) -> &'a V {
        self.storage.vertex_data(self.handle)
    }

    /// Iterates over all triangles that use this vertex as a corner.
    pub fn triangles(&self) -> impl Iterator<Item = TriangleHandle<'a, V>> + 'a {
        let storage = self.storage;
        storage
            .incident_triangles(self.handle)
            .iter()
            .map(move |handle| TriangleHandle::new(storage, *handle))
    }

    /// Returns all vertices that are connected to this vertex by an edge.
    ///
    /// The result is sorted by vertex index.
    pub fn neighbors(&self) -> Vec<VertexHandle<'a, V>> {
        let mut result: Vec<FixedVertexHandle> = self
            .storage
            .incident_triangles(self.handle)
            .iter()
            .flat_map(|triangle| self.storage.triangle_entry(*triangle).vertices)
            .filter(|vertex| *vertex != self.handle)
            .collect();
        result.sort_unstable();
        result.dedup();
        result
            .into_iter()
            .map(|handle| VertexHandle::new(self.storage, handle))
            .collect()
    }

    /// Returns `true` if this vertex lies on the boundary of the mesh.
    pub fn is_on_hull(&self) -> bool {
        self.storage
            .incident_triangles(self.handle)
            .iter()
            .any(|triangle| {
                let entry = self.storage.triangle_entry(*triangle);
                entry.corner_index(self.handle).map_or(false, |corner| {
                    entry.neighbors[(corner + 1) % 3].is_none()
                        || entry.neighbors[(corner + 2) % 3].is_none()
                })
            })
    }
}

impl<'a, V: HasPosition> VertexHandle<'a, V> {
    /// Returns the vertex position.
    pub fn position(&self) -> Point2<V::Scalar> {
        self.data().position()
    }
}

impl<'a, V> TriangleHandle<'a, V> {
    pub(crate) fn new(storage: &'a MeshStorage<V>, handle: FixedTriangleHandle) -> Self {
        Self { storage, handle }
    }

    /// Converts this dynamic handle into a fixed handle.
    pub fn fix(&self) -> FixedTriangleHandle {
        self.handle
    }

    /// Returns the triangle's corners in counterclockwise order.
    pub fn vertices(&self) -> [VertexHandle<'a, V>; 3] {
        let [v0, v1, v2] = self.storage.triangle_entry(self.handle).vertices;
        [
            VertexHandle::new(self.storage, v0),
            VertexHandle::new(self.storage, v1),
            VertexHandle::new(self.storage, v2),
        ]
    }

    /// Returns the neighboring triangles.
    ///
    /// Entry `i` is the triangle across the edge opposite to corner `i`, `None` if that edge
    /// is part of the hull.
    pub fn neighbors(&self) -> [Option<TriangleHandle<'a, V>>; 3] {
        let storage = self.storage;
        self.storage
            .triangle_entry(self.handle)
            .neighbors
            .map(|neighbor| neighbor.map(|handle| TriangleHandle::new(storage, handle)))
    }

    /// Returns all existing neighbors, skipping boundary edges.
    pub fn adjacent_triangles(&self) -> SmallVec<[TriangleHandle<'a, V>; 3]> {
        self.neighbors().into_iter().flatten().collect()
    }
}

impl<'a, V: HasPosition> TriangleHandle<'a, V> {
    /// Returns the corner positions in counterclockwise order.
    pub fn positions(&self) -> [Point2<V::Scalar>; 3] {
        self.vertices().map(|vertex| vertex.position())
    }

    /// Returns the circumcenter and the squared circumradius.
    pub fn circumcircle(&self) -> (Point2<f64>, f64) {
        math::circumcenter(self.storage.triangle_positions(self.handle))
    }

    /// Returns `true` if `position` lies strictly inside this triangle's circumcircle.
    pub fn circumcircle_contains(&self, position: Point2<V::Scalar>) -> bool {
        let [v0, v1, v2] = self.positions();
        math::contained_in_circumference(v0, v1, v2, position)
    }

    /// Returns the barycentric weights of `position` relative to this triangle's corners.
    pub fn barycentric_weights(&self, position: Point2<f64>) -> [f64; 3] {
        math::barycentric_weights(self.storage.triangle_positions(self.handle), position)
    }
}
