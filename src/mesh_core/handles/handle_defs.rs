use std::convert::TryInto;
use std::marker::PhantomData;

/// Internal type definition that is only exposed for documentation purposes.
///
/// Use the type aliases [FixedVertexHandle](crate::handles::FixedVertexHandle) and
/// [FixedTriangleHandle](crate::handles::FixedTriangleHandle) instead.
///
/// A fixed handle is a plain index into one of the arenas owned by a [Mesh](crate::Mesh). It
/// does not borrow the mesh and stays valid for the mesh's lifetime.
pub struct FixedHandleImpl<Type> {
    index: u32,
    ty: PhantomData<fn() -> Type>,
}

impl<Type> FixedHandleImpl<Type> {
    pub(crate) fn new(index: usize) -> Self {
        Self::new_internal(
            index
                .try_into()
                .expect("Index too big - at most 2^32 elements supported"),
        )
    }

    /// Returns the index into the underlying arena.
    ///
    /// Vertex indices follow the order in which vertices were inserted.
    pub fn index(&self) -> usize {
        self.index as usize
    }

    const fn new_internal(index: u32) -> Self {
        Self {
            index,
            ty: PhantomData,
        }
    }
}

impl<Type> Clone for FixedHandleImpl<Type> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Type> Copy for FixedHandleImpl<Type> {}

impl<Type> PartialEq for FixedHandleImpl<Type> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<Type> Eq for FixedHandleImpl<Type> {}

impl<Type> PartialOrd for FixedHandleImpl<Type> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<Type> Ord for FixedHandleImpl<Type> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<Type> std::hash::Hash for FixedHandleImpl<Type> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<Type> std::fmt::Debug for FixedHandleImpl<Type> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedHandle")
            .field("index", &self.index)
            .finish()
    }
}

/// Marker type for vertex handles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VertexTag;

/// Marker type for triangle handles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TriangleTag;

/// Marker type for nodes of the sweep hull.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HullTag;
