use super::handles::{FixedVertexHandle, HullIndex};

#[derive(Clone, Copy, Debug)]
struct Node {
    vertex: FixedVertexHandle,

    /// Previous node in counterclockwise order
    left: HullIndex,
    /// Next node in counterclockwise order
    right: HullIndex,
}

/// The boundary of the triangulated region, stored as a circular doubly linked list of
/// vertices in counterclockwise order.
///
/// Each node together with its right neighbor forms one boundary edge. Replacing the run of
/// edges that a new vertex can see is a local splice.
#[derive(Clone, Debug)]
pub struct Hull {
    data: Vec<Node>,

    /// Spare slots in [`Hull::data`], to keep it small
    empty: Vec<HullIndex>,

    /// Node of the most recently inserted vertex. Always a live node.
    last_inserted: HullIndex,
}

impl Hull {
    /// Creates the hull of a single triangle given in counterclockwise order.
    pub fn from_triangle(vertices: [FixedVertexHandle; 3]) -> Self {
        let data = vertices
            .iter()
            .enumerate()
            .map(|(index, vertex)| Node {
                vertex: *vertex,
                left: HullIndex::new((index + 2) % 3),
                right: HullIndex::new((index + 1) % 3),
            })
            .collect();

        Self {
            data,
            empty: Vec::new(),
            last_inserted: HullIndex::new(2),
        }
    }

    /// Number of vertices on the hull.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.data.len() - self.empty.len()
    }

    pub fn vertex(&self, index: HullIndex) -> FixedVertexHandle {
        self.data[index.index()].vertex
    }

    pub fn next(&self, index: HullIndex) -> HullIndex {
        self.data[index.index()].right
    }

    pub fn prev(&self, index: HullIndex) -> HullIndex {
        self.data[index.index()].left
    }

    /// Iterates over all live nodes in counterclockwise order.
    pub fn nodes(&self) -> impl Iterator<Item = HullIndex> + '_ {
        let start = self.last_inserted;
        let mut current = Some(start);
        std::iter::from_fn(move || {
            let result = current?;
            let next = self.next(result);
            current = if next == start { None } else { Some(next) };
            Some(result)
        })
    }

    /// Iterates over all hull vertices in counterclockwise order.
    pub fn vertices(&self) -> impl Iterator<Item = FixedVertexHandle> + '_ {
        self.nodes().map(|index| self.vertex(index))
    }

    /// Replaces the boundary between the nodes `first` and `last` by the two edges
    /// `first -> vertex` and `vertex -> last`.
    ///
    /// All nodes strictly between `first` and `last` are removed. Returns the new node.
    pub fn replace_run(
        &mut self,
        first: HullIndex,
        last: HullIndex,
        vertex: FixedVertexHandle,
    ) -> HullIndex {
        let mut current = self.next(first);
        while current != last {
            let next = self.next(current);
            self.empty.push(current);
            current = next;
        }

        let node = Node {
            vertex,
            left: first,
            right: last,
        };

        let new_index = if let Some(index) = self.empty.pop() {
            self.data[index.index()] = node;
            index
        } else {
            self.data.push(node);
            HullIndex::new(self.data.len() - 1)
        };

        self.data[first.index()].right = new_index;
        self.data[last.index()].left = new_index;
        self.last_inserted = new_index;
        new_index
    }
}

#[cfg(test)]
mod test {
    use super::Hull;
    use crate::handles::FixedVertexHandle;

    fn vertices(hull: &Hull) -> Vec<usize> {
        hull.vertices().map(|vertex| vertex.index()).collect()
    }

    #[test]
    fn test_from_triangle() {
        let hull = Hull::from_triangle([
            FixedVertexHandle::new(0),
            FixedVertexHandle::new(1),
            FixedVertexHandle::new(2),
        ]);
        assert_eq!(hull.len(), 3);
        assert_eq!(vertices(&hull), vec![2, 0, 1]);

        for node in hull.nodes() {
            assert_eq!(hull.prev(hull.next(node)), node);
        }
    }

    #[test]
    fn test_replace_run() {
        let mut hull = Hull::from_triangle([
            FixedVertexHandle::new(0),
            FixedVertexHandle::new(1),
            FixedVertexHandle::new(2),
        ]);

        // A single edge: nothing is removed
        let first = hull.nodes().find(|node| hull.vertex(*node).index() == 0).unwrap();
        let last = hull.next(first);
        hull.replace_run(first, last, FixedVertexHandle::new(3));
        assert_eq!(hull.len(), 4);
        assert_eq!(vertices(&hull), vec![3, 1, 2, 0]);

        // Two edges: vertex 1 is swallowed
        let first = hull.nodes().find(|node| hull.vertex(*node).index() == 3).unwrap();
        let last = hull.next(hull.next(first));
        hull.replace_run(first, last, FixedVertexHandle::new(4));
        assert_eq!(hull.len(), 4);
        assert_eq!(vertices(&hull), vec![4, 2, 0, 3]);

        for node in hull.nodes() {
            assert_eq!(hull.prev(hull.next(node)), node);
            assert_eq!(hull.next(hull.prev(node)), node);
        }
    }
}
