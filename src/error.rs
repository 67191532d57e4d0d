use thiserror::Error;

/// The error type used for rejecting a single coordinate value.
///
/// Coordinates can be checked up front with [crate::validate_coordinate] or
/// [crate::validate_vertex].
#[derive(Error, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Debug, Hash)]
pub enum InsertionError {
    /// A coordinate value was too small.
    ///
    /// The absolute value of any coordinate must either be zero or greater than or equal
    /// to [crate::MIN_ALLOWED_VALUE].
    #[error("coordinate is too small")]
    TooSmall,

    /// A coordinate value was too large.
    ///
    /// The absolute value of any coordinate must be less than or equal to
    /// [crate::MAX_ALLOWED_VALUE].
    #[error("coordinate is too large")]
    TooLarge,

    /// A coordinate value was NaN.
    #[error("coordinate is NaN")]
    NAN,
}

/// Errors that abort the construction of a [Mesh](crate::Mesh).
///
/// No partially built mesh is ever returned.
#[derive(Error, Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum MeshError {
    /// The input element at `index` has an unusable coordinate.
    #[error("sample {index} has an invalid coordinate: {error}")]
    InvalidCoordinate {
        /// Position of the offending element in the input list
        index: usize,
        /// The reason for rejecting it
        error: InsertionError,
    },

    /// Fewer than three distinct positions were given or all of them lie on a single line.
    ///
    /// No seed triangle exists in this case.
    #[error("no seed triangle exists among {distinct} distinct samples")]
    DegenerateInput {
        /// Number of distinct positions after duplicates were dropped
        distinct: usize,
    },

    /// A vertex could not be connected to the hull during the sweep.
    ///
    /// This indicates a broken invariant rather than bad input.
    #[error("sample {vertex} is not visible from any hull edge")]
    HullVisibility {
        /// Position of the offending element in the input list
        vertex: usize,
    },

    /// Restoring the Delaunay property after an insertion did not terminate.
    #[error("edge flipping did not terminate after {iterations} iterations")]
    FlipNonTermination {
        /// Number of worklist entries processed before giving up
        iterations: usize,
    },
}

/// Errors caused by an invalid [GridConfig](crate::GridConfig) or output buffer.
#[derive(Error, Copy, Clone, PartialEq, Debug)]
pub enum RasterError {
    /// The grid has no cells.
    #[error("grid must have a non-zero width and height, got {width}x{height}")]
    EmptyGrid {
        /// Configured number of columns
        width: usize,
        /// Configured number of rows
        height: usize,
    },

    /// The number of pixels `width * height` overflows `usize`.
    #[error("grid of {width}x{height} pixels is too large")]
    GridTooLarge {
        /// Configured number of columns
        width: usize,
        /// Configured number of rows
        height: usize,
    },

    /// The world bounds are not finite or do not span a positive area.
    #[error("world bounds must be finite with min < max")]
    InvalidBounds,

    /// The output buffer does not have exactly `width * height` cells.
    #[error("output buffer holds {actual} cells, expected {expected}")]
    BufferSize {
        /// `width * height`
        expected: usize,
        /// Length of the given buffer
        actual: usize,
    },
}
