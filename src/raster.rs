//! Resampling of a [Mesh] onto a regular pixel grid.

use std::ops::{Index, IndexMut};

use log::info;
use rayon::prelude::*;

use crate::{HasPosition, Mesh, Point2, RasterError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Describes a pixel grid and the rectangle of world space it covers.
///
/// Row 0 is the top row, i.e. the row with the largest y coordinates. Each pixel is sampled at
/// its center.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct GridConfig {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Left border of the covered rectangle
    pub world_min_x: f64,
    /// Bottom border of the covered rectangle
    pub world_min_y: f64,
    /// Right border of the covered rectangle
    pub world_max_x: f64,
    /// Top border of the covered rectangle
    pub world_max_y: f64,
    /// Value of all pixels outside of the mesh's hull
    pub sentinel: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            world_min_x: 0.0,
            world_min_y: 0.0,
            world_max_x: 1.0,
            world_max_y: 1.0,
            sentinel: f64::NAN,
        }
    }
}

impl GridConfig {
    /// Creates a grid of `width * height` pixels covering the rectangle between `min` and
    /// `max`. The sentinel defaults to `NaN`.
    ///
    /// # Example
    /// ```
    /// use shull::{GridConfig, Point2};
    ///
    /// # fn main() -> Result<(), shull::RasterError> {
    /// let config = GridConfig::new(4, 2, Point2::new(0.0, 0.0), Point2::new(4.0, 2.0))?;
    /// assert_eq!(config.to_image(0, 0), Point2::new(0.5, 1.5));
    /// assert_eq!(config.to_pixel(Point2::new(3.9, 0.1)), Some((3, 1)));
    /// assert_eq!(config.to_pixel(Point2::new(4.5, 0.1)), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        width: usize,
        height: usize,
        min: Point2<f64>,
        max: Point2<f64>,
    ) -> Result<Self, RasterError> {
        let config = Self {
            width,
            height,
            world_min_x: min.x,
            world_min_y: min.y,
            world_max_x: max.x,
            world_max_y: max.y,
            sentinel: f64::NAN,
        };
        config.validate()?;
        Ok(config)
    }

    /// Replaces the value written for pixels outside of the hull.
    pub fn with_sentinel(mut self, sentinel: f64) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Checks that the grid has at least one pixel, that its pixel count fits into `usize`
    /// and that the bounds span a finite, positive area.
    pub fn validate(&self) -> Result<(), RasterError> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(RasterError::GridTooLarge {
                width: self.width,
                height: self.height,
            });
        }

        let bounds = [
            self.world_min_x,
            self.world_min_y,
            self.world_max_x,
            self.world_max_y,
        ];
        if bounds.iter().any(|value| !value.is_finite())
            || self.world_min_x >= self.world_max_x
            || self.world_min_y >= self.world_max_y
        {
            return Err(RasterError::InvalidBounds);
        }
        Ok(())
    }

    /// Number of pixels. Saturates for configs rejected with [RasterError::GridTooLarge].
    pub fn len(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Returns `true` if the grid has no pixels. Such a config fails validation.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// World space extent of a single pixel along x and y.
    pub fn cell_size(&self) -> (f64, f64) {
        (
            (self.world_max_x - self.world_min_x) / self.width as f64,
            (self.world_max_y - self.world_min_y) / self.height as f64,
        )
    }

    /// Returns the world position of the center of pixel `(px, py)`.
    pub fn to_image(&self, px: usize, py: usize) -> Point2<f64> {
        let (dx, dy) = self.cell_size();
        Point2::new(
            self.world_min_x + (px as f64 + 0.5) * dx,
            self.world_max_y - (py as f64 + 0.5) * dy,
        )
    }

    /// Returns the pixel `(px, py)` containing a world position.
    ///
    /// Returns `None` if the position lies outside of the grid.
    pub fn to_pixel(&self, position: Point2<f64>) -> Option<(usize, usize)> {
        let (dx, dy) = self.cell_size();
        let px = ((position.x - self.world_min_x) / dx).floor();
        let py = ((self.world_max_y - position.y) / dy).floor();

        let in_range = |value: f64, size: usize| value >= 0.0 && value < size as f64;
        if in_range(px, self.width) && in_range(py, self.height) {
            Some((px as usize, py as usize))
        } else {
            None
        }
    }
}

/// A dense, row-major grid of interpolated values.
///
/// Indexed by `(row, column)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Grid {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the value of a pixel or `None` if it lies outside of the grid.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row < self.height && column < self.width {
            Some(self[(row, column)])
        } else {
            None
        }
    }

    /// Iterates over all rows, starting with the top row.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks(self.width)
    }

    /// Returns all values in row-major order.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Consumes the grid and returns its row-major buffer.
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.data[index.0 * self.width + index.1]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.data[index.0 * self.width + index.1]
    }
}

/// Resamples the values of a [Mesh] onto a pixel grid.
///
/// Every pixel center is located in the mesh and the values of the containing triangle's
/// corners are interpolated linearly. Pixels outside of the hull receive the configured
/// sentinel. Rows are processed in parallel.
///
/// # Example
/// ```
/// use shull::{GridConfig, Mesh, Point2, Rasterizer, Sample};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mesh = Mesh::new(vec![
///     Sample::new(0.0, 0.0, 1.0),
///     Sample::new(4.0, 0.0, 1.0),
///     Sample::new(0.0, 4.0, 1.0),
/// ])?;
///
/// let config = GridConfig::new(4, 4, Point2::new(0.0, 0.0), Point2::new(4.0, 4.0))?;
/// let grid = Rasterizer::new(config)?.rasterize(&mesh, Sample::value);
///
/// // Bottom left pixel lies inside the triangle, top right pixel does not
/// assert_eq!(grid[(3, 0)], 1.0);
/// assert!(grid[(0, 3)].is_nan());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rasterizer {
    config: GridConfig,
}

impl Rasterizer {
    /// Creates a rasterizer after validating its config.
    pub fn new(config: GridConfig) -> Result<Self, RasterError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the grid this rasterizer writes.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Rasterizes into a newly allocated grid.
    pub fn rasterize<V, F>(&self, mesh: &Mesh<V>, value: F) -> Grid
    where
        V: HasPosition + Sync,
        F: Fn(&V) -> f64 + Sync,
    {
        let mut data = vec![self.config.sentinel; self.config.len()];
        self.fill(mesh, &value, &mut data);
        Grid {
            width: self.config.width,
            height: self.config.height,
            data,
        }
    }

    /// Rasterizes into a caller provided, row-major buffer.
    ///
    /// Every cell of the buffer is overwritten.
    ///
    /// # Errors
    /// Returns [RasterError::BufferSize] if the buffer does not hold exactly
    /// `width * height` cells.
    pub fn rasterize_into<V, F>(
        &self,
        mesh: &Mesh<V>,
        value: F,
        buffer: &mut [f64],
    ) -> Result<(), RasterError>
    where
        V: HasPosition + Sync,
        F: Fn(&V) -> f64 + Sync,
    {
        let expected = self.config.len();
        if buffer.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }
        self.fill(mesh, &value, buffer);
        Ok(())
    }

    fn fill<V, F>(&self, mesh: &Mesh<V>, value: &F, buffer: &mut [f64])
    where
        V: HasPosition + Sync,
        F: Fn(&V) -> f64 + Sync,
    {
        let config = &self.config;
        let inside: usize = buffer
            .par_chunks_mut(config.width)
            .enumerate()
            .map(|(row, cells)| {
                let mut inside = 0;
                for (column, cell) in cells.iter_mut().enumerate() {
                    let position = config.to_image(column, row);
                    *cell = match mesh.interpolate(value, position) {
                        Some(interpolated) => {
                            inside += 1;
                            interpolated
                        }
                        None => config.sentinel,
                    };
                }
                inside
            })
            .sum();

        info!(
            "rasterized {}x{} grid, {} of {} pixels inside of the hull",
            config.width,
            config.height,
            inside,
            config.len()
        );
    }
}
