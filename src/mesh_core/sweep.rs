use hashbrown::HashSet;
use log::{debug, warn};

use super::handles::{FixedVertexHandle, HullIndex};
use super::hull::Hull;
use super::legalize::{legalize_edges, EdgeCandidate};
use super::locate::{locate, PositionInMesh};
use super::math;
use super::storage::MeshStorage;
use super::storage_operations;
use crate::{HasPosition, MeshError, MeshStats, Orientation, Point2};

/// An input element waiting for its insertion.
struct Pending<V> {
    /// Position in the caller's input list, used for error reporting
    index: usize,
    position: Point2<f64>,
    element: V,
}

pub(crate) struct SweepResult<V> {
    pub(crate) storage: MeshStorage<V>,
    pub(crate) hull: Hull,
    pub(crate) stats: MeshStats,
}

/// Key identifying an exact position. `-0.0` and `0.0` are treated as equal.
fn position_key(position: Point2<f64>) -> (u64, u64) {
    ((position.x + 0.0).to_bits(), (position.y + 0.0).to_bits())
}

/// Validates all elements and drops duplicate positions, keeping the first one.
fn collect_pending<V: HasPosition>(
    elements: Vec<V>,
    stats: &mut MeshStats,
) -> Result<Vec<Pending<V>>, MeshError> {
    let mut seen = HashSet::with_capacity(elements.len());
    let mut result = Vec::with_capacity(elements.len());

    for (index, element) in elements.into_iter().enumerate() {
        math::validate_vertex(&element)
            .map_err(|error| MeshError::InvalidCoordinate { index, error })?;

        let position = element.position().to_f64();
        if seen.insert(position_key(position)) {
            result.push(Pending {
                index,
                position,
                element,
            });
        } else {
            warn!(
                "skipping sample {} at ({}, {}): duplicate position",
                index, position.x, position.y
            );
            stats.duplicates_skipped += 1;
        }
    }
    Ok(result)
}

fn index_of_min<T>(items: &[T], key: impl Fn(usize, &T) -> Option<f64>) -> Option<usize> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| key(index, item).map(|value| (index, value)))
        .min_by(|(_, l), (_, r)| l.total_cmp(r))
        .map(|(index, _)| index)
}

/// Chooses the seed triangle. Returns the indices of its corners in counterclockwise order.
///
/// The seed is the element closest to the centroid, the second corner is the seed's nearest
/// neighbor and the third corner minimizes the circumradius. The resulting circumcircle
/// contains no other element.
fn choose_seed<V>(pending: &[Pending<V>]) -> Option<[usize; 3]> {
    if pending.len() < 3 {
        return None;
    }

    let sum = pending
        .iter()
        .fold(Point2::new(0.0, 0.0), |sum, p| sum + p.position);
    let centroid = sum * (1.0 / pending.len() as f64);

    let seed = index_of_min(pending, |_, p| Some(p.position.distance_2(centroid)))?;
    let seed_position = pending[seed].position;

    let second = index_of_min(pending, |index, p| {
        (index != seed).then(|| p.position.distance_2(seed_position))
    })?;
    let second_position = pending[second].position;

    let third = index_of_min(pending, |_, p| {
        match math::orientation(seed_position, second_position, p.position) {
            Orientation::Collinear => None,
            _ => {
                let (_, radius_2) =
                    math::circumcenter([seed_position, second_position, p.position]);
                Some(radius_2)
            }
        }
    })?;

    if math::is_ordered_ccw(seed_position, second_position, pending[third].position) {
        Some([seed, second, third])
    } else {
        Some([seed, third, second])
    }
}

/// Builds a Delaunay triangulation with a sweep hull.
///
/// Elements are inserted in order of increasing distance to the circumcenter of the seed
/// triangle. Each new element usually lies outside of the current hull; it is connected to
/// every hull edge it can see and the Delaunay property is restored by flipping edges afterwards.
pub(crate) fn build<V: HasPosition>(elements: Vec<V>) -> Result<SweepResult<V>, MeshError> {
    let mut stats = MeshStats::default();
    let mut pending = collect_pending(elements, &mut stats)?;

    let distinct = pending.len();
    let seed = choose_seed(&pending).ok_or(MeshError::DegenerateInput { distinct })?;

    let mut storage = MeshStorage::with_capacity(distinct);

    // Remove the seed elements back to front to keep the remaining indices valid
    let mut removal_order = seed;
    removal_order.sort_unstable_by(|l, r| r.cmp(l));
    let mut seed_elements: Vec<(usize, Pending<V>)> = removal_order
        .iter()
        .map(|index| (*index, pending.swap_remove(*index)))
        .collect();

    let mut corners = Vec::with_capacity(3);
    for corner in seed {
        let position = seed_elements
            .iter()
            .position(|(index, _)| *index == corner)
            .expect("Seed element must exist. This is a bug in shull.");
        let (_, element) = seed_elements.swap_remove(position);
        corners.push((element.position, storage.push_vertex(element.element)));
    }
    let corner_positions = [corners[0].0, corners[1].0, corners[2].0];
    let corners = [corners[0].1, corners[1].1, corners[2].1];

    storage_operations::create_triangle(&mut storage, corners);
    let mut hull = Hull::from_triangle(corners);

    let (center, radius_2) = math::circumcenter(corner_positions);
    debug!(
        "seed triangle {:?} with circumcenter ({}, {}) and radius {}",
        corner_positions,
        center.x,
        center.y,
        radius_2.sqrt()
    );

    pending.sort_by(|l, r| {
        l.position
            .distance_2(center)
            .total_cmp(&r.position.distance_2(center))
            .then(l.index.cmp(&r.index))
    });

    let mut edges = Vec::new();
    for next in pending {
        insert_next(&mut storage, &mut hull, next, &mut edges)?;
        stats.flips += legalize_edges(&mut storage, &mut edges)?;
    }
    stats.inserted = storage.num_vertices();

    Ok(SweepResult {
        storage,
        hull,
        stats,
    })
}

/// Returns `true` if the hull edge starting at `edge` can be seen from `position`.
///
/// The hull is kept convex, so an edge is visible exactly if `position` lies strictly on its
/// outer side. The decision is exact for all valid coordinates.
pub(crate) fn is_visible<V: HasPosition>(
    storage: &MeshStorage<V>,
    hull: &Hull,
    edge: HullIndex,
    position: Point2<f64>,
) -> bool {
    let from = storage.position(hull.vertex(edge));
    let to = storage.position(hull.vertex(hull.next(edge)));
    math::side_query(from, to, position).is_on_right_side()
}

/// Returns the first and last hull node of the run of edges visible from `position`.
fn find_visible_run<V: HasPosition>(
    storage: &MeshStorage<V>,
    hull: &Hull,
    position: Point2<f64>,
) -> Option<(HullIndex, HullIndex)> {
    let found = hull
        .nodes()
        .find(|edge| is_visible(storage, hull, *edge, position))?;

    let mut first = found;
    loop {
        let prev = hull.prev(first);
        if prev == found || !is_visible(storage, hull, prev, position) {
            break;
        }
        first = prev;
    }

    let mut last_edge = found;
    loop {
        let next = hull.next(last_edge);
        if next == first || !is_visible(storage, hull, next, position) {
            break;
        }
        last_edge = next;
    }

    let last = hull.next(last_edge);
    if last == first {
        // Every edge is visible, which is impossible for a point outside of a convex hull
        return None;
    }
    Some((first, last))
}

fn insert_next<V: HasPosition>(
    storage: &mut MeshStorage<V>,
    hull: &mut Hull,
    next: Pending<V>,
    edges: &mut Vec<EdgeCandidate>,
) -> Result<FixedVertexHandle, MeshError> {
    let position = next.position;

    if let Some((first, last)) = find_visible_run(storage, hull, position) {
        let new_vertex = storage.push_vertex(next.element);
        connect_visible_run(storage, hull, first, last, new_vertex, edges);
        return Ok(new_vertex);
    }

    // Rounding can place an element out of sweep order. It then lies on the hull or inside of
    // it and is inserted like a regular inner vertex.
    let PositionInMesh::InTriangle(triangle) = locate(storage, position) else {
        return Err(MeshError::HullVisibility { vertex: next.index });
    };
    debug!(
        "sample {} at ({}, {}) is not outside of the hull, inserting it as inner vertex",
        next.index, position.x, position.y
    );

    let entry = *storage.triangle_entry(triangle);
    let positions = storage.triangle_positions(triangle);
    let on_edge = (0..3).find(|opposite| {
        let from = positions[(opposite + 1) % 3];
        let to = positions[(opposite + 2) % 3];
        math::side_query(from, to, position).is_on_line()
    });

    let new_vertex = storage.push_vertex(next.element);
    match on_edge {
        None => {
            let [a, b, c] = entry.vertices;
            storage_operations::split_triangle(storage, triangle, new_vertex);
            edges.extend([(a, b), (b, c), (c, a)]);
        }
        Some(opposite) => {
            let (from, to) = entry.edge(opposite);
            let c = entry.vertices[opposite];
            if entry.neighbors[opposite].is_some() {
                let (other, other_opposite) = storage
                    .find_edge(to, from)
                    .expect("Inner edge without twin. This is a bug in shull.");
                let d = storage.triangle_entry(other).vertices[other_opposite];
                storage_operations::split_inner_edge(storage, triangle, opposite, new_vertex);
                edges.extend([(c, from), (to, c), (d, to), (from, d)]);
            } else {
                storage_operations::split_boundary_edge(storage, triangle, opposite, new_vertex);
                edges.extend([(to, c), (c, from)]);

                let node = hull
                    .nodes()
                    .find(|node| hull.vertex(*node) == from && hull.vertex(hull.next(*node)) == to)
                    .expect("Boundary edge missing on hull. This is a bug in shull.");
                hull.replace_run(node, hull.next(node), new_vertex);
            }
        }
    }
    Ok(new_vertex)
}

/// Connects `new_vertex` to every hull edge between the nodes `first` and `last`.
fn connect_visible_run<V>(
    storage: &mut MeshStorage<V>,
    hull: &mut Hull,
    first: HullIndex,
    last: HullIndex,
    new_vertex: FixedVertexHandle,
    edges: &mut Vec<EdgeCandidate>,
) {
    let mut run = vec![hull.vertex(first)];
    let mut current = first;
    while current != last {
        current = hull.next(current);
        run.push(hull.vertex(current));
    }

    let mut previous_triangle = None;
    for pair in run.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let (owner, _) = storage
            .find_edge(from, to)
            .expect("Hull edge without triangle. This is a bug in shull.");

        let triangle = storage_operations::create_triangle(storage, [to, from, new_vertex]);
        storage_operations::link(storage, triangle, Some(owner));
        storage_operations::link(storage, triangle, previous_triangle);
        previous_triangle = Some(triangle);

        edges.push((from, to));
        if from != run[0] {
            edges.push((from, new_vertex));
        }
    }

    hull.replace_run(first, last, new_vertex);
}

#[cfg(test)]
mod test {
    use super::{build, choose_seed, collect_pending, insert_next, is_visible, Pending};
    use crate::mesh_core::hull::Hull;
    use crate::mesh_core::storage::MeshStorage;
    use crate::mesh_core::storage_operations::create_triangle;
    use crate::{MeshError, MeshStats, Point2};

    #[test]
    fn test_choose_seed() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(-3.0, -3.0),
            Point2::new(1.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 1.2),
        ];
        let pending = collect_pending(points, &mut MeshStats::default()).unwrap();
        let [a, b, c] = choose_seed(&pending).unwrap();
        let mut corners = vec![a, b, c];
        corners.sort_unstable();
        assert_eq!(corners, vec![0, 2, 4]);

        let positions = [a, b, c].map(|index| pending[index].position);
        assert!(crate::mesh_core::math::is_ordered_ccw(
            positions[0],
            positions[1],
            positions[2]
        ));
    }

    #[test]
    fn test_choose_seed_collinear() {
        let points: Vec<_> = (0..10).map(|x| Point2::new(x as f64, 2.0 * x as f64)).collect();
        let pending = collect_pending(points, &mut MeshStats::default()).unwrap();
        assert_eq!(choose_seed(&pending), None);
    }

    #[test]
    fn test_collect_pending_drops_duplicates() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(-0.0, 0.0),
            Point2::new(1.0, 0.0),
        ];
        let mut stats = MeshStats::default();
        let pending = collect_pending(points, &mut stats).unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[1].index, 1);
        assert_eq!(stats.duplicates_skipped, 2);
    }

    #[test]
    fn test_invalid_coordinate() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, f64::NAN),
            Point2::new(0.0, 1.0),
        ];
        assert_eq!(
            build(points).err(),
            Some(MeshError::InvalidCoordinate {
                index: 1,
                error: crate::InsertionError::NAN
            })
        );
    }

    #[test]
    fn test_is_visible() {
        let mut storage = MeshStorage::default();
        let v0 = storage.push_vertex(Point2::new(0.0, 0.0));
        let v1 = storage.push_vertex(Point2::new(1.0, 0.0));
        let v2 = storage.push_vertex(Point2::new(0.0, 1.0));
        create_triangle(&mut storage, [v0, v1, v2]);
        let hull = Hull::from_triangle([v0, v1, v2]);

        let edge_of = |vertex| hull.nodes().find(|node| hull.vertex(*node) == vertex).unwrap();
        let below = Point2::new(0.5, -1.0);
        assert!(is_visible(&storage, &hull, edge_of(v0), below));
        assert!(!is_visible(&storage, &hull, edge_of(v1), below));
        assert!(!is_visible(&storage, &hull, edge_of(v2), below));

        let far = Point2::new(2.0, 2.0);
        assert!(!is_visible(&storage, &hull, edge_of(v0), far));
        assert!(is_visible(&storage, &hull, edge_of(v1), far));
        assert!(!is_visible(&storage, &hull, edge_of(v2), far));

        // Positions on the line of an edge don't see it
        assert!(!is_visible(&storage, &hull, edge_of(v0), Point2::new(2.0, 0.0)));
    }

    #[test]
    fn test_insert_inside_hull() {
        let mut storage = MeshStorage::default();
        let v0 = storage.push_vertex(Point2::new(0.0, 0.0));
        let v1 = storage.push_vertex(Point2::new(4.0, 0.0));
        let v2 = storage.push_vertex(Point2::new(0.0, 4.0));
        create_triangle(&mut storage, [v0, v1, v2]);
        let mut hull = Hull::from_triangle([v0, v1, v2]);
        let mut edges = Vec::new();

        let pending = |index, x, y| Pending {
            index,
            position: Point2::new(x, y),
            element: Point2::new(x, y),
        };

        insert_next(&mut storage, &mut hull, pending(3, 1.0, 1.0), &mut edges).unwrap();
        assert_eq!(storage.num_triangles(), 3);
        assert_eq!(hull.len(), 3);
        assert_eq!(edges.len(), 3);

        // Exactly on the boundary edge v0 - v1
        let on_edge = insert_next(&mut storage, &mut hull, pending(4, 2.0, 0.0), &mut edges);
        let on_edge = on_edge.unwrap();
        assert_eq!(storage.num_triangles(), 4);
        assert_eq!(hull.len(), 4);
        assert!(hull.vertices().any(|vertex| vertex == on_edge));
        storage.sanity_check();
    }
}
