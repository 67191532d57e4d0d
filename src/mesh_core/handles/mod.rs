pub(crate) mod handle_defs;
mod public_handles;

pub use handle_defs::{FixedHandleImpl, HullTag, TriangleTag, VertexTag};
pub use public_handles::{TriangleHandle, VertexHandle};

/// Fixed handle to a vertex. See [VertexHandle] for the borrowing counterpart.
pub type FixedVertexHandle = FixedHandleImpl<VertexTag>;

/// Fixed handle to a triangle. See [TriangleHandle] for the borrowing counterpart.
pub type FixedTriangleHandle = FixedHandleImpl<TriangleTag>;

pub(crate) type HullIndex = FixedHandleImpl<HullTag>;
