mod handles;
mod hull;
mod legalize;
mod line_side_info;
mod locate;
mod storage;
pub(crate) mod storage_operations;
pub(crate) mod sweep;

pub(crate) mod math;

pub use handles::*;
pub use line_side_info::{LineSideInfo, Orientation};
pub use locate::PositionInMesh;
pub(crate) use storage::MeshStorage;

pub(crate) use locate::{interpolate, locate, nearest_vertex};
