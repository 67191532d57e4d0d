use std::ops::{Add, Mul, Sub};

use num_traits::Signed;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scalar type of sample coordinates, in practice `f32` or `f64`.
///
/// Predicates are evaluated exactly on the `f64` conversion of each coordinate.
pub trait MeshNum: Signed + PartialOrd + Copy + Into<f64> + std::fmt::Debug {}

impl<T> MeshNum for T where T: Signed + PartialOrd + Copy + Into<f64> + std::fmt::Debug {}

/// A position in the plane.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct Point2<S> {
    /// Horizontal coordinate
    pub x: S,
    /// Vertical coordinate, growing towards the top row of a raster
    pub y: S,
}

impl<S> Point2<S> {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: S, y: S) -> Self {
        Point2 { x, y }
    }
}

impl<S: MeshNum> Point2<S> {
    /// Squared euclidean distance to `other`.
    #[inline]
    pub fn distance_2(&self, other: Self) -> S {
        let delta = *self - other;
        delta.dot(delta)
    }

    /// Widens both coordinates to `f64`.
    #[inline]
    pub fn to_f64(self) -> Point2<f64> {
        Point2::new(self.x.into(), self.y.into())
    }

    pub(crate) fn dot(&self, other: Self) -> S {
        self.x * other.x + self.y * other.y
    }
}

impl<S: MeshNum> Add for Point2<S> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Point2::new(self.x + other.x, self.y + other.y)
    }
}

impl<S: MeshNum> Sub for Point2<S> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Point2::new(self.x - other.x, self.y - other.y)
    }
}

impl<S: MeshNum> Mul<S> for Point2<S> {
    type Output = Self;

    fn mul(self, factor: S) -> Self {
        Point2::new(self.x * factor, self.y * factor)
    }
}

/// Anything that can be placed into a [Mesh](crate::Mesh).
///
/// [Sample](crate::Sample) is the usual implementor. Custom types carrying more than a single
/// scalar can implement this trait and pick their value when rasterizing.
pub trait HasPosition {
    /// Coordinate type of the position
    type Scalar: MeshNum;

    /// The element's location. Must stay the same for as long as the element is meshed.
    fn position(&self) -> Point2<Self::Scalar>;
}

impl<S: MeshNum> HasPosition for Point2<S> {
    type Scalar = S;

    fn position(&self) -> Point2<S> {
        *self
    }
}
