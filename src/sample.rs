use crate::{HasPosition, Point2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A scalar measurement taken at a 2D position, e.g. a height or an intensity.
///
/// Samples are the default input of a [Mesh](crate::Mesh). They are immutable once created;
/// the value is interpolated by a [Rasterizer](crate::Rasterizer).
///
/// # Example
/// ```
/// use shull::{HasPosition, Point2, Sample};
///
/// let sample = Sample::new(1.0, 2.0, 42.0);
/// assert_eq!(sample.position(), Point2::new(1.0, 2.0));
/// assert_eq!(sample.value(), 42.0);
/// ```
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct Sample {
    x: f64,
    y: f64,
    value: f64,
}

impl Sample {
    /// Creates a new sample at `(x, y)` carrying `value`.
    #[inline]
    pub const fn new(x: f64, y: f64, value: f64) -> Self {
        Sample { x, y, value }
    }

    /// The sample's x coordinate.
    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// The sample's y coordinate.
    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// The measured scalar.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl HasPosition for Sample {
    type Scalar = f64;

    #[inline]
    fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

impl From<(f64, f64, f64)> for Sample {
    #[inline]
    fn from((x, y, value): (f64, f64, f64)) -> Self {
        Sample::new(x, y, value)
    }
}

impl From<[f64; 3]> for Sample {
    #[inline]
    fn from([x, y, value]: [f64; 3]) -> Self {
        Sample::new(x, y, value)
    }
}
