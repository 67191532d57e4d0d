use log::info;

use crate::mesh_core::sweep;
use crate::mesh_core::{
    FixedTriangleHandle, FixedVertexHandle, MeshStorage, PositionInMesh, TriangleHandle,
    VertexHandle,
};
use crate::{HasPosition, MeshError, Point2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counters collected while a [Mesh] is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct MeshStats {
    /// Number of vertices in the finished mesh
    pub inserted: usize,
    /// Number of input elements dropped because an earlier element had the same position
    pub duplicates_skipped: usize,
    /// Number of edge flips performed to restore the Delaunay property
    pub flips: usize,
}

/// A two dimensional [Delaunay triangulation](https://en.wikipedia.org/wiki/Delaunay_triangulation)
/// over a set of scattered samples.
///
/// The mesh fulfills the *Delaunay property*: no vertex lies strictly inside the circumcircle
/// of any triangle. This makes it well suited for linear interpolation of values that are only
/// known at the sample positions.
///
/// A mesh is built once from all of its elements with [Mesh::new] and is read-only afterwards.
/// Elements need to implement [HasPosition]; the bundled [Sample](crate::Sample) type carries
/// a position and a scalar value.
///
/// # Example
/// ```
/// use shull::{Mesh, MeshError, Sample};
///
/// fn main() -> Result<(), MeshError> {
///     let mesh = Mesh::new(vec![
///         Sample::new(0.0, 0.0, 0.0),
///         Sample::new(1.0, 0.0, 1.0),
///         Sample::new(0.0, 1.0, 2.0),
///     ])?;
///
///     assert_eq!(mesh.num_vertices(), 3);
///     assert_eq!(mesh.num_triangles(), 1);
///     assert_eq!(mesh.convex_hull_size(), 3);
///     Ok(())
/// }
/// ```
///
/// # Construction
/// The mesh is built with a sweep hull: a seed triangle is chosen close to the centroid of all
/// elements and the remaining elements are added in order of increasing distance to its
/// circumcenter. Each new vertex is connected to all hull edges it can see. Edges violating the
/// Delaunay property are flipped after every insertion.
///
/// Construction fails if the input contains an invalid coordinate or if all positions lie on
/// a single line. Duplicate positions are skipped; the first element at each position is kept.
#[derive(Clone, Debug)]
pub struct Mesh<V> {
    storage: MeshStorage<V>,
    hull: Vec<FixedVertexHandle>,
    stats: MeshStats,
}

impl<V: HasPosition> Mesh<V> {
    /// Builds the Delaunay triangulation of all given elements.
    ///
    /// Vertices are numbered in insertion order, which generally differs from the input
    /// order.
    ///
    /// # Errors
    /// - [MeshError::InvalidCoordinate] if any coordinate is `NaN`, too large or too small.
    /// - [MeshError::DegenerateInput] if fewer than three distinct positions are given or if
    ///   all of them are collinear.
    ///
    /// [MeshError::HullVisibility] and [MeshError::FlipNonTermination] indicate an internal
    /// failure and should not occur for valid input.
    pub fn new(elements: Vec<V>) -> Result<Self, MeshError> {
        let sweep::SweepResult {
            storage,
            hull,
            stats,
        } = sweep::build(elements)?;

        let mesh = Mesh {
            hull: hull.vertices().collect(),
            storage,
            stats,
        };

        info!(
            "built mesh with {} vertices and {} triangles ({} on hull, {} flips, {} duplicates skipped)",
            mesh.num_vertices(),
            mesh.num_triangles(),
            mesh.convex_hull_size(),
            mesh.stats.flips,
            mesh.stats.duplicates_skipped
        );
        Ok(mesh)
    }

    /// Returns the vertex closest to `position`.
    ///
    /// This is a linear search over all vertices.
    pub fn nearest_vertex(&self, position: Point2<f64>) -> Option<VertexHandle<V>> {
        crate::mesh_core::nearest_vertex(&self.storage, position)
            .map(|handle| self.storage.vertex(handle))
    }

    /// Locates the triangle containing `position`.
    ///
    /// Positions on an edge shared by two triangles are reported in either of them.
    ///
    /// # Example
    /// ```
    /// use shull::{Mesh, MeshError, Point2, PositionInMesh};
    ///
    /// # fn main() -> Result<(), MeshError> {
    /// let mesh = Mesh::new(vec![
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(1.0, 0.0),
    ///     Point2::new(0.0, 1.0),
    /// ])?;
    ///
    /// assert!(matches!(
    ///     mesh.locate(Point2::new(0.2, 0.2)),
    ///     PositionInMesh::InTriangle(_)
    /// ));
    /// assert_eq!(mesh.locate(Point2::new(2.0, 2.0)), PositionInMesh::OutsideOfHull);
    /// # Ok(())
    /// # }
    /// ```
    pub fn locate(&self, position: Point2<f64>) -> PositionInMesh {
        crate::mesh_core::locate(&self.storage, position)
    }

    /// Linearly interpolates a value at `position`.
    ///
    /// `value` extracts the scalar of a vertex. Positions exactly on a vertex return that
    /// vertex's value without any rounding. Returns `None` outside of the hull.
    ///
    /// # Example
    /// ```
    /// use shull::{Mesh, MeshError, Point2, Sample};
    ///
    /// # fn main() -> Result<(), MeshError> {
    /// let mesh = Mesh::new(vec![
    ///     Sample::new(0.0, 0.0, 0.0),
    ///     Sample::new(2.0, 0.0, 2.0),
    ///     Sample::new(0.0, 2.0, 4.0),
    /// ])?;
    ///
    /// let value = mesh.interpolate(Sample::value, Point2::new(1.0, 0.5)).unwrap();
    /// assert!((value - 2.0).abs() < 1.0e-12);
    /// assert_eq!(mesh.interpolate(Sample::value, Point2::new(3.0, 3.0)), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn interpolate<F>(&self, value: F, position: Point2<f64>) -> Option<f64>
    where
        F: Fn(&V) -> f64,
    {
        crate::mesh_core::interpolate(&self.storage, value, position)
    }
}

impl<V> Mesh<V> {
    /// Number of vertices. Skipped duplicates are not counted.
    pub fn num_vertices(&self) -> usize {
        self.storage.num_vertices()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.storage.num_triangles()
    }

    /// Number of vertices on the boundary, including vertices on straight boundary segments.
    pub fn convex_hull_size(&self) -> usize {
        self.hull.len()
    }

    /// Returns the counters collected during construction.
    pub fn stats(&self) -> MeshStats {
        self.stats
    }

    /// Converts a fixed vertex handle into a dynamic handle.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this mesh.
    pub fn vertex(&self, handle: FixedVertexHandle) -> VertexHandle<V> {
        self.storage.vertex(handle)
    }

    /// Converts a fixed triangle handle into a dynamic handle.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this mesh.
    pub fn triangle(&self, handle: FixedTriangleHandle) -> TriangleHandle<V> {
        self.storage.triangle(handle)
    }

    /// Iterates over all vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexHandle<V>> + '_ {
        self.storage
            .fixed_vertices()
            .map(move |handle| self.storage.vertex(handle))
    }

    /// Iterates over all triangles.
    pub fn triangles(&self) -> impl Iterator<Item = TriangleHandle<V>> + '_ {
        self.storage
            .fixed_triangles()
            .map(move |handle| self.storage.triangle(handle))
    }

    /// Iterates over the boundary vertices in counterclockwise order.
    pub fn hull(&self) -> impl Iterator<Item = VertexHandle<V>> + '_ {
        self.hull
            .iter()
            .map(move |handle| self.storage.vertex(*handle))
    }

    /// Returns all vertices sharing an edge with `handle`, sorted by index.
    pub fn vertex_neighbors(&self, handle: FixedVertexHandle) -> Vec<VertexHandle<V>> {
        self.storage.vertex(handle).neighbors()
    }

    /// Returns all triangles sharing an edge with `handle`.
    pub fn triangle_neighbors(&self, handle: FixedTriangleHandle) -> Vec<TriangleHandle<V>> {
        self.storage
            .triangle(handle)
            .adjacent_triangles()
            .into_vec()
    }
}

#[cfg(test)]
impl<V: HasPosition> Mesh<V> {
    pub(crate) fn sanity_check(&self) {
        use crate::mesh_core::math;

        self.storage.sanity_check();

        let num_vertices = self.num_vertices();
        let hull_size = self.convex_hull_size();
        assert_eq!(self.num_triangles(), 2 * num_vertices - hull_size - 2);

        let mut boundary_edges = 0;
        for triangle in self.triangles() {
            boundary_edges += triangle
                .neighbors()
                .iter()
                .filter(|neighbor| neighbor.is_none())
                .count();
        }
        assert_eq!(boundary_edges, hull_size);

        for (index, from) in self.hull.iter().enumerate() {
            let to = self.hull[(index + 1) % hull_size];
            let (triangle, opposite) = self
                .storage
                .find_edge(*from, to)
                .expect("Hull edge must belong to a triangle");
            assert_eq!(self.storage.triangle_entry(triangle).neighbors[opposite], None);
            assert!(self.vertex(*from).is_on_hull());

            let next = self.hull[(index + 2) % hull_size];
            assert!(
                math::side_query(
                    self.storage.position(*from),
                    self.storage.position(to),
                    self.storage.position(next),
                )
                .is_on_left_side_or_on_line(),
                "Hull turns right at {:?}",
                to
            );
        }

        for triangle in self.triangles() {
            let [v0, v1, v2] = self.storage.triangle_positions(triangle.fix());
            let corners = triangle.vertices().map(|vertex| vertex.fix());
            for vertex in self.storage.fixed_vertices() {
                if corners.contains(&vertex) {
                    continue;
                }
                assert!(
                    !math::contained_in_circumference(v0, v1, v2, self.storage.position(vertex)),
                    "Vertex {:?} lies inside the circumcircle of {:?}",
                    vertex,
                    triangle
                );
            }
        }
    }
}
