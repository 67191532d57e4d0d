use crate::{HasPosition, InsertionError, LineSideInfo, MeshNum, Orientation, Point2};

/// The smallest allowed coordinate value greater than zero. This value is equal to 2<sup>-142</sup>.
///
/// The *absolute value* of any sample coordinate must be either zero or greater
/// than or equal to this value.
/// This prevents underflow when evaluating the exact geometric predicates.
///
/// *See also [validate_coordinate], [validate_vertex], [MAX_ALLOWED_VALUE], [mitigate_underflow]*

// Shewchuk's predicates neither overflow nor underflow for inputs with exponents
// in the range -[142, 201] under IEEE-754 double precision arithmetic.
pub const MIN_ALLOWED_VALUE: f64 = 1.793662034335766e-43; // 1.0 * 2^-142

/// The largest allowed coordinate value. This value is equal to 2<sup>201</sup>.
///
/// *See also [validate_coordinate], [validate_vertex], [MIN_ALLOWED_VALUE]*
pub const MAX_ALLOWED_VALUE: f64 = 3.2138760885179806e60; // 1.0 * 2^201

/// Checks if a coordinate value is suitable for triangulation.
///
/// Will return an error if and only if
///  - The absolute value of the coordinate is too small (See [MIN_ALLOWED_VALUE])
///  - The absolute value of the coordinate is too large (See [MAX_ALLOWED_VALUE])
///  - The coordinate is NaN (not a number)
///
/// Passing in any non-finite floating point number (e.g. `f32::NEG_INFINITY`) will
/// result in `Err(InsertionError::TooLarge)`.
pub fn validate_coordinate<S: MeshNum>(value: S) -> Result<(), InsertionError> {
    let as_f64: f64 = value.into();
    if as_f64.is_nan() {
        Err(InsertionError::NAN)
    } else if as_f64.abs() < MIN_ALLOWED_VALUE && as_f64 != 0.0 {
        Err(InsertionError::TooSmall)
    } else if as_f64.abs() > MAX_ALLOWED_VALUE {
        Err(InsertionError::TooLarge)
    } else {
        Ok(())
    }
}

/// Checks if all coordinates of a vertex are valid. See [validate_coordinate].
pub fn validate_vertex<V: HasPosition>(vertex: &V) -> Result<(), InsertionError> {
    let position = vertex.position();
    validate_coordinate(position.x)?;
    validate_coordinate(position.y)?;
    Ok(())
}

/// Prevents underflow issues of a position by setting any coordinate that is too small to zero.
///
/// This always rounds towards zero. Useful if samples come from an uncontrollable source.
///
/// # Example
/// ```
/// use shull::{validate_coordinate, InsertionError, Point2};
///
/// let invalid_position = Point2::new(1.0e-44, 42.0);
/// assert_eq!(validate_coordinate(invalid_position.x), Err(InsertionError::TooSmall));
///
/// let valid_position = shull::mitigate_underflow(invalid_position);
/// assert_eq!(valid_position, Point2::new(0.0, 42.0));
/// ```
pub fn mitigate_underflow(position: Point2<f64>) -> Point2<f64> {
    Point2::new(
        mitigate_underflow_for_coordinate(position.x),
        mitigate_underflow_for_coordinate(position.y),
    )
}

fn mitigate_underflow_for_coordinate<S: MeshNum>(coordinate: S) -> S {
    if coordinate != S::zero() && coordinate.abs().into() < MIN_ALLOWED_VALUE {
        S::zero()
    } else {
        coordinate
    }
}

fn to_robust_coord<S: MeshNum>(point: Point2<S>) -> robust::Coord<S> {
    robust::Coord {
        x: point.x,
        y: point.y,
    }
}

/// Returns on which side of the directed line `p1 -> p2` the query point lies.
///
/// The result is exact for all valid coordinates.
pub fn side_query<S>(p1: Point2<S>, p2: Point2<S>, query_point: Point2<S>) -> LineSideInfo
where
    S: MeshNum,
{
    let p1 = to_robust_coord(p1);
    let p2 = to_robust_coord(p2);
    let query_point = to_robust_coord(query_point);

    let result = robust::orient2d(p1, p2, query_point);
    LineSideInfo::from_determinant(result)
}

/// Returns the turn direction of the ordered triple `(p, q, r)`.
///
/// # Example
/// ```
/// use shull::{orientation, Orientation, Point2};
///
/// let (p, q) = (Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
/// assert_eq!(orientation(p, q, Point2::new(0.0, 1.0)), Orientation::CounterClockwise);
/// assert_eq!(orientation(p, q, Point2::new(0.0, -1.0)), Orientation::Clockwise);
/// assert_eq!(orientation(p, q, Point2::new(2.0, 0.0)), Orientation::Collinear);
/// ```
pub fn orientation<S: MeshNum>(p: Point2<S>, q: Point2<S>, r: Point2<S>) -> Orientation {
    side_query(p, q, r).orientation()
}

pub(crate) fn is_ordered_ccw<S>(p1: Point2<S>, p2: Point2<S>, query_point: Point2<S>) -> bool
where
    S: MeshNum,
{
    side_query(p1, p2, query_point).is_on_left_side()
}

/// Returns `true` if `q` is collinear with `p` and `r` and lies between them (inclusive).
pub fn is_on_segment<S: MeshNum>(p: Point2<S>, q: Point2<S>, r: Point2<S>) -> bool {
    let within = |a: S, b: S, value: S| {
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        low <= value && value <= high
    };
    side_query(p, r, q).is_on_line() && within(p.x, r.x, q.x) && within(p.y, r.y, q.y)
}

/// Returns `true` if the segment `p1 - q1` crosses or touches the segment `p2 - q2`.
///
/// Segments that only share an end point are considered intersecting, as are collinear
/// segments that overlap.
pub fn segments_intersect<S: MeshNum>(
    p1: Point2<S>,
    q1: Point2<S>,
    p2: Point2<S>,
    q2: Point2<S>,
) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    use Orientation::Collinear;
    (o1 == Collinear && is_on_segment(p1, p2, q1))
        || (o2 == Collinear && is_on_segment(p1, q2, q1))
        || (o3 == Collinear && is_on_segment(p2, p1, q2))
        || (o4 == Collinear && is_on_segment(p2, q1, q2))
}

/// Returns `true` if `p` lies strictly inside the circumcircle of the counterclockwise
/// ordered triangle `v1, v2, v3`.
pub fn contained_in_circumference<S>(
    v1: Point2<S>,
    v2: Point2<S>,
    v3: Point2<S>,
    p: Point2<S>,
) -> bool
where
    S: MeshNum,
{
    let v1 = to_robust_coord(v1);
    let v2 = to_robust_coord(v2);
    let v3 = to_robust_coord(v3);
    let p = to_robust_coord(p);

    // incircle expects all vertices to be ordered CW for right handed systems.
    robust::incircle(v3, v2, v1, p) < 0.0
}

/// Returns the circumcenter of a triangle and its squared circumradius.
///
/// The result is undefined (infinite or NaN) for collinear positions.
pub fn circumcenter(positions: [Point2<f64>; 3]) -> (Point2<f64>, f64) {
    let [v0, v1, v2] = positions;
    let b = v1 - v0;
    let c = v2 - v0;

    let d = 2.0 * (b.x * c.y - c.x * b.y);
    let len_b = b.dot(b);
    let len_c = c.dot(c);
    let d_inv = 1.0 / d;

    let x = (len_b * c.y - len_c * b.y) * d_inv;
    let y = (-len_b * c.x + len_c * b.x) * d_inv;
    let result = Point2::new(x, y);
    (result + v0, x * x + y * y)
}

/// Returns the barycentric weights of `p` relative to a non-degenerate triangle.
///
/// The weights sum up to one. The first weight is derived from the two others, hence
/// querying the first corner yields exactly `[1.0, 0.0, 0.0]`.
pub fn barycentric_weights(positions: [Point2<f64>; 3], p: Point2<f64>) -> [f64; 3] {
    let [v0, v1, v2] = positions;
    let b = v1 - v0;
    let c = v2 - v0;
    let d = p - v0;

    let det = b.x * c.y - b.y * c.x;
    let w1 = (d.x * c.y - d.y * c.x) / det;
    let w2 = (b.x * d.y - b.y * d.x) / det;
    [1.0 - w1 - w2, w1, w2]
}

/// Linearly interpolates three corner values at `p`.
///
/// Expressed relative to the first corner so that a constant field is reproduced exactly.
pub(crate) fn interpolate_linear(
    positions: [Point2<f64>; 3],
    values: [f64; 3],
    p: Point2<f64>,
) -> f64 {
    let [_, w1, w2] = barycentric_weights(positions, p);
    let [value0, value1, value2] = values;
    value0 + w1 * (value1 - value0) + w2 * (value2 - value0)
}

#[cfg(test)]
mod test {
    use super::{mitigate_underflow_for_coordinate, validate_coordinate};
    use crate::{InsertionError, Orientation, Point2};
    use approx::assert_relative_eq;

    #[test]
    fn test_validate_coordinate() {
        use super::{validate_coordinate, InsertionError::*};
        assert_eq!(validate_coordinate(f64::NAN), Err(NAN));
        let max_value = super::MAX_ALLOWED_VALUE;

        assert_eq!(validate_coordinate(f64::INFINITY), Err(TooLarge));
        assert_eq!(validate_coordinate(f64::NEG_INFINITY), Err(TooLarge));
        assert_eq!(validate_coordinate(max_value * 2.0), Err(TooLarge));

        let min_value = super::MIN_ALLOWED_VALUE;
        assert_eq!(validate_coordinate(min_value / 2.0), Err(TooSmall));

        assert_eq!(validate_coordinate(f32::MIN_POSITIVE), Ok(()));
        assert_eq!(validate_coordinate(f32::MAX), Ok(()));
        assert_eq!(validate_coordinate(min_value), Ok(()));
        assert_eq!(validate_coordinate(0.0), Ok(()));
    }

    #[test]
    fn test_mitigate_underflow() {
        use float_next_after::NextAfter;

        for number_under_test in [
            0.0.next_after(f64::NEG_INFINITY),
            0.0.next_after(f64::INFINITY),
            super::MIN_ALLOWED_VALUE.next_after(f64::NEG_INFINITY),
            (-super::MIN_ALLOWED_VALUE).next_after(f64::INFINITY),
        ] {
            assert!(validate_coordinate(number_under_test).is_err());
            let mitigated = mitigate_underflow_for_coordinate(number_under_test);
            assert_ne!(mitigated, number_under_test);
            assert_eq!(mitigated, 0.0);
        }

        assert_eq!(
            validate_coordinate(mitigate_underflow_for_coordinate(f64::NAN)),
            Err(InsertionError::NAN),
        );
    }

    #[test]
    fn check_allowed_value_range() {
        assert_eq!(super::MIN_ALLOWED_VALUE, 0.5f64.powi(142));
        assert_eq!(super::MAX_ALLOWED_VALUE, 2.0f64.powi(201));
    }

    #[test]
    fn test_orientation() {
        use super::orientation;

        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(1.0, 1.0);

        assert_eq!(orientation(p1, p2, Point2::new(1.0, 0.0)), Orientation::Clockwise);
        assert_eq!(
            orientation(p1, p2, Point2::new(0.0, 1.0)),
            Orientation::CounterClockwise
        );
        assert_eq!(orientation(p1, p2, Point2::new(0.5, 0.5)), Orientation::Collinear);
        // Not representable exactly, but still decided consistently
        assert_eq!(
            orientation(p1, p2, Point2::new(0.1 + 0.2, 0.3)),
            orientation(p1, p2, Point2::new(0.30000000000000004, 0.3))
        );
    }

    #[test]
    fn test_is_on_segment() {
        use super::is_on_segment;

        let p = Point2::new(0.0, 0.0);
        let r = Point2::new(2.0, 2.0);
        assert!(is_on_segment(p, Point2::new(1.0, 1.0), r));
        assert!(is_on_segment(p, p, r));
        assert!(is_on_segment(p, r, r));
        assert!(!is_on_segment(p, Point2::new(3.0, 3.0), r));
        assert!(!is_on_segment(p, Point2::new(1.0, 1.5), r));
    }

    #[test]
    fn test_segments_intersect() {
        use super::segments_intersect;

        let (f0, t0) = (Point2::new(0., 0.), Point2::new(5., 5.0));
        let (f1, t1) = (Point2::new(-1.5, 1.), Point2::new(1.0, -1.5));
        let (f2, t2) = (Point2::new(0.5, 4.), Point2::new(0.5, -4.));

        assert!(!segments_intersect(f0, t0, f1, t1));
        assert!(!segments_intersect(f1, t1, f0, t0));
        assert!(segments_intersect(f0, t0, f2, t2));
        assert!(segments_intersect(f2, t2, f0, t0));
        assert!(segments_intersect(f1, t1, f2, t2));
        assert!(segments_intersect(f2, t2, f1, t1));
    }

    #[test]
    fn test_segments_intersect_end_points() {
        use super::segments_intersect;

        // One end point touching another segment
        let (f1, t1) = (Point2::new(0.33f64, 0.33f64), Point2::new(1.0, 0.0));
        let (f2, t2) = (Point2::new(0.33, -1.0), Point2::new(0.33, 1.0));
        assert!(segments_intersect(f1, t1, f2, t2));
        assert!(segments_intersect(f2, t2, f1, t1));

        // Shared end point
        let (f4, t4) = (Point2::new(0.33, 0.33), Point2::new(0.0, 2.0));
        assert!(segments_intersect(f1, t1, f4, t4));
        assert!(segments_intersect(f4, t4, f1, t1));
    }

    #[test]
    fn test_segments_intersect_collinear() {
        use super::segments_intersect;

        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        // Overlapping
        assert!(segments_intersect(a, b, Point2::new(1.0, 0.0), Point2::new(3.0, 0.0)));
        // Disjoint on the same line
        assert!(!segments_intersect(a, b, Point2::new(3.0, 0.0), Point2::new(4.0, 0.0)));
        // Parallel
        assert!(!segments_intersect(a, b, Point2::new(0.0, 1.0), Point2::new(2.0, 1.0)));
    }

    #[test]
    fn test_contained_in_circumference() {
        use super::contained_in_circumference;

        let (a1, a2, a3) = (3f64, 2f64, 1f64);
        let offset = Point2::new(0.5, 0.7);
        let v1 = Point2::new(a1.sin(), a1.cos()) * 2. + offset;
        let v2 = Point2::new(a2.sin(), a2.cos()) * 2. + offset;
        let v3 = Point2::new(a3.sin(), a3.cos()) * 2. + offset;
        assert!(super::side_query(v1, v2, v3).is_on_left_side());
        assert!(contained_in_circumference(v1, v2, v3, offset));
        let shrunk = (v1 - offset) * 0.9 + offset;
        assert!(contained_in_circumference(v1, v2, v3, shrunk));
        let expanded = (v1 - offset) * 1.1 + offset;
        assert!(!contained_in_circumference(v1, v2, v3, expanded));
        assert!(!contained_in_circumference(
            v1,
            v2,
            v3,
            Point2::new(2.0 + offset.x, 2.0 + offset.y)
        ));
        // Points on the circle are not contained
        assert!(!contained_in_circumference(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ));
    }

    #[test]
    fn test_circumcenter() {
        let (center, radius_2) = super::circumcenter([
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ]);
        assert_relative_eq!(center.x, 1.0);
        assert_relative_eq!(center.y, 1.0);
        assert_relative_eq!(radius_2, 2.0);
    }

    #[test]
    fn test_barycentric_weights() {
        use super::{barycentric_weights, interpolate_linear};

        let triangle = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        assert_eq!(barycentric_weights(triangle, triangle[0]), [1.0, 0.0, 0.0]);

        let [w0, w1, w2] = barycentric_weights(triangle, Point2::new(0.25, 0.5));
        assert_relative_eq!(w0, 0.25);
        assert_relative_eq!(w1, 0.25);
        assert_relative_eq!(w2, 0.5);

        let values = [1.0, 3.0, 5.0];
        assert_relative_eq!(
            interpolate_linear(triangle, values, Point2::new(0.25, 0.5)),
            0.25 * 1.0 + 0.25 * 3.0 + 0.5 * 5.0
        );
        assert_eq!(
            interpolate_linear(triangle, [5.0; 3], Point2::new(0.1, 0.7)),
            5.0
        );
    }
}
