use smallvec::SmallVec;

use super::handles::{FixedTriangleHandle, FixedVertexHandle, TriangleHandle, VertexHandle};
use crate::{HasPosition, Point2};

pub(crate) type IncidentTriangles = SmallVec<[FixedTriangleHandle; 8]>;

#[derive(Clone, Debug)]
pub(crate) struct VertexEntry<V> {
    pub(crate) data: V,
    /// Every live triangle using this vertex as a corner
    pub(crate) triangles: IncidentTriangles,
}

/// Corners are stored in counterclockwise order. `neighbors[i]` is the triangle across the
/// edge opposite of `vertices[i]`, `None` for boundary edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TriangleEntry {
    pub(crate) vertices: [FixedVertexHandle; 3],
    pub(crate) neighbors: [Option<FixedTriangleHandle>; 3],
}

impl TriangleEntry {
    pub(crate) fn new(vertices: [FixedVertexHandle; 3]) -> Self {
        Self {
            vertices,
            neighbors: [None; 3],
        }
    }

    pub(crate) fn corner_index(&self, vertex: FixedVertexHandle) -> Option<usize> {
        self.vertices.iter().position(|v| *v == vertex)
    }

    /// Returns the directed edge opposite to a corner, in counterclockwise direction.
    pub(crate) fn edge(&self, opposite: usize) -> (FixedVertexHandle, FixedVertexHandle) {
        (
            self.vertices[(opposite + 1) % 3],
            self.vertices[(opposite + 2) % 3],
        )
    }

    /// Returns the index of the single corner that is not shared with `other`.
    ///
    /// Returns `None` if both triangles don't share exactly one edge.
    pub(crate) fn edge_index_towards(&self, other: &TriangleEntry) -> Option<usize> {
        let mut result = None;
        let mut shared = 0;
        for (index, vertex) in self.vertices.iter().enumerate() {
            if other.vertices.contains(vertex) {
                shared += 1;
            } else {
                result = Some(index);
            }
        }
        if shared == 2 {
            result
        } else {
            None
        }
    }
}

/// Arena owning all vertices and triangles of a mesh.
///
/// Retired triangle slots are recycled by later insertions.
#[derive(Clone, Debug)]
pub struct MeshStorage<V> {
    pub(super) vertices: Vec<VertexEntry<V>>,
    pub(super) triangles: Vec<Option<TriangleEntry>>,
    pub(super) free_triangles: Vec<FixedTriangleHandle>,
}

impl<V> Default for MeshStorage<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
            free_triangles: Vec::new(),
        }
    }
}

impl<V> MeshStorage<V> {
    pub(crate) fn with_capacity(num_vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            triangles: Vec::with_capacity(num_vertices * 2),
            free_triangles: Vec::new(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of live triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len() - self.free_triangles.len()
    }

    pub(crate) fn push_vertex(&mut self, data: V) -> FixedVertexHandle {
        let handle = FixedVertexHandle::new(self.vertices.len());
        self.vertices.push(VertexEntry {
            data,
            triangles: IncidentTriangles::new(),
        });
        handle
    }

    pub fn vertex(&self, handle: FixedVertexHandle) -> VertexHandle<V> {
        VertexHandle::new(self, handle)
    }

    pub fn triangle(&self, handle: FixedTriangleHandle) -> TriangleHandle<V> {
        TriangleHandle::new(self, handle)
    }

    pub fn vertex_data(&self, handle: FixedVertexHandle) -> &V {
        &self.vertices[handle.index()].data
    }

    pub(crate) fn incident_triangles(&self, handle: FixedVertexHandle) -> &[FixedTriangleHandle] {
        &self.vertices[handle.index()].triangles
    }

    pub(crate) fn triangle_entry(&self, handle: FixedTriangleHandle) -> &TriangleEntry {
        self.triangles[handle.index()]
            .as_ref()
            .expect("Accessed a retired triangle. This is a bug in shull.")
    }

    pub(crate) fn triangle_entry_mut(&mut self, handle: FixedTriangleHandle) -> &mut TriangleEntry {
        self.triangles[handle.index()]
            .as_mut()
            .expect("Accessed a retired triangle. This is a bug in shull.")
    }

    #[cfg(test)]
    pub(crate) fn is_live(&self, handle: FixedTriangleHandle) -> bool {
        matches!(self.triangles.get(handle.index()), Some(Some(_)))
    }

    pub fn fixed_vertices(&self) -> impl Iterator<Item = FixedVertexHandle> {
        (0..self.vertices.len()).map(FixedVertexHandle::new)
    }

    pub fn fixed_triangles(&self) -> impl Iterator<Item = FixedTriangleHandle> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_some())
            .map(|(index, _)| FixedTriangleHandle::new(index))
    }

    /// Finds the triangle that contains the directed edge `from -> to` in counterclockwise
    /// direction. Returns the triangle and the index of the corner opposite to that edge.
    pub(crate) fn find_edge(
        &self,
        from: FixedVertexHandle,
        to: FixedVertexHandle,
    ) -> Option<(FixedTriangleHandle, usize)> {
        self.incident_triangles(from)
            .iter()
            .find_map(|&triangle| {
                let entry = self.triangle_entry(triangle);
                let corner = entry.corner_index(from)?;
                if entry.vertices[(corner + 1) % 3] == to {
                    Some((triangle, (corner + 2) % 3))
                } else {
                    None
                }
            })
    }
}

impl<V: HasPosition> MeshStorage<V> {
    pub(crate) fn position(&self, handle: FixedVertexHandle) -> Point2<f64> {
        self.vertices[handle.index()].data.position().to_f64()
    }

    pub(crate) fn triangle_positions(&self, handle: FixedTriangleHandle) -> [Point2<f64>; 3] {
        let [v0, v1, v2] = self.triangle_entry(handle).vertices;
        [self.position(v0), self.position(v1), self.position(v2)]
    }

    #[cfg(test)]
    pub fn sanity_check(&self) {
        use super::math;

        for handle in self.fixed_triangles() {
            let entry = self.triangle_entry(handle);
            let [p0, p1, p2] = self.triangle_positions(handle);
            assert!(
                math::is_ordered_ccw(p0, p1, p2),
                "Triangle {:?} is not counterclockwise",
                handle
            );

            for vertex in entry.vertices {
                assert!(self.incident_triangles(vertex).contains(&handle));
            }

            for (index, neighbor) in entry.neighbors.iter().enumerate() {
                if let Some(neighbor) = neighbor {
                    let neighbor_entry = self.triangle_entry(*neighbor);
                    let back_index = neighbor_entry
                        .edge_index_towards(entry)
                        .expect("Neighbors must share an edge");
                    assert_eq!(neighbor_entry.neighbors[back_index], Some(handle));
                    assert_eq!(entry.edge_index_towards(neighbor_entry), Some(index));
                    let (from, to) = entry.edge(index);
                    assert_eq!(neighbor_entry.edge(back_index), (to, from));
                } else {
                    let (from, to) = entry.edge(index);
                    // Boundary edges are never shared
                    assert!(self.find_edge(to, from).is_none());
                }
            }
        }

        for vertex in self.fixed_vertices() {
            for triangle in self.incident_triangles(vertex) {
                assert!(self.is_live(*triangle));
                assert!(self.triangle_entry(*triangle).corner_index(vertex).is_some());
            }
        }

        for free in &self.free_triangles {
            assert!(!self.is_live(*free));
        }
    }
}
