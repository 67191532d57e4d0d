//! # shull
//! Sweep-hull Delaunay triangulation of scattered 2D samples and resampling of their values
//! onto dense pixel grids.
//!
//! # Features
//! * Builds a [Delaunay triangulation](Mesh) of any type implementing [HasPosition], e.g.
//!   the bundled [Sample] carrying a position and a scalar value.
//! * Uses exact geometric predicates to avoid floating point rounding issues.
//! * Handles collinear boundaries, cocircular vertices and duplicate positions.
//! * Locates positions in the mesh and interpolates values linearly.
//! * Rasterizes a mesh onto a regular grid in parallel, see [Rasterizer].
//!
//! # Example
//! ```
//! use shull::{GridConfig, Mesh, Point2, Rasterizer, Sample};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let samples = vec![
//!     Sample::new(0.0, 0.0, 10.0),
//!     Sample::new(8.0, 0.0, 20.0),
//!     Sample::new(8.0, 8.0, 30.0),
//!     Sample::new(0.0, 8.0, 20.0),
//!     Sample::new(3.0, 5.0, 25.0),
//! ];
//! let mesh = Mesh::new(samples)?;
//! assert_eq!(mesh.num_triangles(), 4);
//!
//! let config = GridConfig::new(16, 16, Point2::new(0.0, 0.0), Point2::new(8.0, 8.0))?;
//! let grid = Rasterizer::new(config)?.rasterize(&mesh, Sample::value);
//! assert!(grid.data().iter().all(|value| (10.0..=30.0).contains(value)));
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//! The crate emits diagnostics through the [log](https://docs.rs/log) facade and never installs
//! a logger itself.

#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(missing_docs)]

mod error;
mod mesh;
mod mesh_core;
mod point;
mod raster;
mod sample;

#[cfg(test)]
mod test_utilities;

pub use crate::error::{InsertionError, MeshError, RasterError};
pub use crate::mesh::{Mesh, MeshStats};
pub use crate::mesh_core::math::{
    barycentric_weights, circumcenter, contained_in_circumference, is_on_segment,
    mitigate_underflow, orientation, segments_intersect, side_query, validate_coordinate,
    validate_vertex, MAX_ALLOWED_VALUE, MIN_ALLOWED_VALUE,
};
pub use crate::mesh_core::{LineSideInfo, Orientation, PositionInMesh};
pub use crate::point::{HasPosition, MeshNum, Point2};
pub use crate::raster::{Grid, GridConfig, Rasterizer};
pub use crate::sample::Sample;

/// Handle types used to navigate a [Mesh].
///
/// *Fixed handles* ([FixedVertexHandle](handles::FixedVertexHandle),
/// [FixedTriangleHandle](handles::FixedTriangleHandle)) are plain indices that can be stored
/// freely. *Dynamic handles* ([VertexHandle](handles::VertexHandle),
/// [TriangleHandle](handles::TriangleHandle)) borrow the mesh and offer methods to navigate
/// its graph.
pub mod handles {
    pub use crate::mesh_core::{
        FixedHandleImpl, FixedTriangleHandle, FixedVertexHandle, TriangleHandle, TriangleTag,
        VertexHandle, VertexTag,
    };
}
