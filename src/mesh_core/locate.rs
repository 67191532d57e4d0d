use super::handles::{FixedTriangleHandle, FixedVertexHandle};
use super::math;
use super::storage::MeshStorage;
use crate::{HasPosition, Point2};

/// Describes the position of a query point relative to a [Mesh](crate::Mesh).
///
/// Created by [Mesh::locate](crate::Mesh::locate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionInMesh {
    /// The query point coincides with a vertex.
    OnVertex(FixedVertexHandle),

    /// The query point lies inside of a triangle or on one of its edges.
    InTriangle(FixedTriangleHandle),

    /// The query point lies outside of the mesh's hull.
    OutsideOfHull,
}

/// Returns the vertex closest to `position`.
///
/// Runs in `O(n)` for `n` vertices. Returns `None` only for an empty storage.
pub fn nearest_vertex<V: HasPosition>(
    storage: &MeshStorage<V>,
    position: Point2<f64>,
) -> Option<FixedVertexHandle> {
    storage
        .fixed_vertices()
        .map(|vertex| (vertex, storage.position(vertex).distance_2(position)))
        .min_by(|(_, l), (_, r)| l.total_cmp(r))
        .map(|(vertex, _)| vertex)
}

/// Returns the index of an edge of `triangle` that separates it from `position`.
///
/// Returns `None` if `position` lies inside the triangle or on its boundary.
fn separating_edge<V: HasPosition>(
    storage: &MeshStorage<V>,
    triangle: FixedTriangleHandle,
    position: Point2<f64>,
) -> Option<usize> {
    let positions = storage.triangle_positions(triangle);
    (0..3).find(|opposite| {
        let from = positions[(opposite + 1) % 3];
        let to = positions[(opposite + 2) % 3];
        math::side_query(from, to, position).is_on_right_side()
    })
}

/// Locates `position` by walking the triangle graph.
///
/// The walk starts at the triangles around the nearest vertex and repeatedly crosses an edge
/// that separates the current triangle from the query point. Leaving the mesh through a
/// boundary edge means the point lies outside of the hull.
pub fn locate<V: HasPosition>(storage: &MeshStorage<V>, position: Point2<f64>) -> PositionInMesh {
    let Some(nearest) = nearest_vertex(storage, position) else {
        return PositionInMesh::OutsideOfHull;
    };
    if storage.position(nearest) == position {
        return PositionInMesh::OnVertex(nearest);
    }

    let fan = storage.incident_triangles(nearest);
    if let Some(triangle) = fan
        .iter()
        .find(|triangle| separating_edge(storage, **triangle, position).is_none())
    {
        return PositionInMesh::InTriangle(*triangle);
    }

    let Some(&start) = fan.first() else {
        return PositionInMesh::OutsideOfHull;
    };
    walk(storage, start, position).unwrap_or_else(|| locate_by_scan(storage, position))
}

fn walk<V: HasPosition>(
    storage: &MeshStorage<V>,
    start: FixedTriangleHandle,
    position: Point2<f64>,
) -> Option<PositionInMesh> {
    let mut current = start;
    // A walk in a Delaunay triangulation never visits a triangle twice
    for _ in 0..=storage.num_triangles() {
        match separating_edge(storage, current, position) {
            None => return Some(PositionInMesh::InTriangle(current)),
            Some(edge) => match storage.triangle_entry(current).neighbors[edge] {
                Some(next) => current = next,
                None => return Some(PositionInMesh::OutsideOfHull),
            },
        }
    }
    None
}

fn locate_by_scan<V: HasPosition>(
    storage: &MeshStorage<V>,
    position: Point2<f64>,
) -> PositionInMesh {
    storage
        .fixed_triangles()
        .find(|triangle| separating_edge(storage, *triangle, position).is_none())
        .map_or(PositionInMesh::OutsideOfHull, PositionInMesh::InTriangle)
}

/// Interpolates the values of the triangle containing `position`.
///
/// Returns `None` outside of the hull.
pub fn interpolate<V, F>(storage: &MeshStorage<V>, value: F, position: Point2<f64>) -> Option<f64>
where
    V: HasPosition,
    F: Fn(&V) -> f64,
{
    match locate(storage, position) {
        PositionInMesh::OnVertex(vertex) => Some(value(storage.vertex_data(vertex))),
        PositionInMesh::InTriangle(triangle) => {
            let [v0, v1, v2] = storage.triangle_entry(triangle).vertices;
            let values = [
                value(storage.vertex_data(v0)),
                value(storage.vertex_data(v1)),
                value(storage.vertex_data(v2)),
            ];
            Some(math::interpolate_linear(
                storage.triangle_positions(triangle),
                values,
                position,
            ))
        }
        PositionInMesh::OutsideOfHull => None,
    }
}
