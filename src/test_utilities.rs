use crate::{Point2, Sample};
use rand::distributions::{Distribution, Uniform};
use rand::{Rng, SeedableRng};

pub const SEED: &[u8; 32] = b"wPYxAkIiHcEmSBAxQFoXFrpYToCe1B71";
pub const SEED2: &[u8; 32] = b"14LzG37Y9EHTcmLW8vBDqWwtYsCeVVyF";

pub fn random_points_in_range(range: f64, size: usize, seed: &[u8; 32]) -> Vec<Point2<f64>> {
    let mut rng = rand::rngs::StdRng::from_seed(*seed);
    let range = Uniform::new(-range, range);
    let mut points = Vec::with_capacity(size);
    for _ in 0..size {
        let x = range.sample(&mut rng);
        let y = range.sample(&mut rng);
        points.push(Point2::new(x, y));
    }
    points
}

pub fn random_points_with_seed(size: usize, seed: &[u8; 32]) -> Vec<Point2<f64>> {
    random_points_in_range(1.0, size, seed)
}

/// Random samples in the unit square around the origin, carrying a smooth height field.
pub fn random_samples_with_seed(size: usize, seed: &[u8; 32]) -> Vec<Sample> {
    random_points_with_seed(size, seed)
        .into_iter()
        .map(|point| Sample::new(point.x, point.y, (point.x * 3.0).sin() + point.y * point.y))
        .collect()
}

/// Points with `x` in `[-1, 1]` lying within `jitter` of the line `y = slope * x`.
pub fn random_thin_strip(
    rng: &mut impl Rng,
    size: usize,
    slope: f64,
    jitter: f64,
) -> Vec<Point2<f64>> {
    let x_range = Uniform::new(-1.0, 1.0);
    let jitter_range = Uniform::new(-jitter, jitter);
    (0..size)
        .map(|_| {
            let x = x_range.sample(rng);
            Point2::new(x, slope * x + jitter_range.sample(rng))
        })
        .collect()
}
