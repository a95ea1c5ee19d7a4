//! Height grid type

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2};

/// A square grid of decoded elevation values.
///
/// The grid side is always `tile_size + 1` where `tile_size` is a power of
/// two: the extra row and column carry the backfilled border that the RTIN
/// subdivision requires. Values are stored row-major, `(row, col)` = `(y, x)`.
///
/// A `HeightGrid` is created once per decode and treated as immutable by the
/// rest of the pipeline.
///
/// # Example
///
/// ```ignore
/// use relief_core::HeightGrid;
///
/// let mut grid = HeightGrid::new(257)?;
/// grid.set(10, 20, 1532.4)?;
/// let value = grid.at(20, 10); // (x, y) accessor
/// ```
#[derive(Debug, Clone)]
pub struct HeightGrid {
    /// Elevations in row-major order (row, col)
    data: Array2<f32>,
}

/// Whether `side` has the `2^n + 1` form (n >= 1) the triangulation needs.
pub fn is_valid_side(side: usize) -> bool {
    side >= 3 && (side - 1).is_power_of_two()
}

impl HeightGrid {
    /// Create a zero-filled grid of the given side.
    ///
    /// Fails with [`Error::InvalidRasterShape`] unless `side == 2^n + 1`.
    pub fn new(side: usize) -> Result<Self> {
        Self::filled(side, 0.0)
    }

    /// Create a grid of the given side filled with a constant elevation.
    pub fn filled(side: usize, value: f32) -> Result<Self> {
        if !is_valid_side(side) {
            return Err(Error::InvalidRasterShape {
                width: side,
                height: side,
            });
        }
        Ok(Self {
            data: Array2::from_elem((side, side), value),
        })
    }

    /// Create a grid from existing row-major data.
    pub fn from_vec(data: Vec<f32>, side: usize) -> Result<Self> {
        if !is_valid_side(side) || data.len() != side * side {
            return Err(Error::InvalidRasterShape {
                width: side,
                height: data.len() / side.max(1),
            });
        }
        let array = Array2::from_shape_vec((side, side), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self { data: array })
    }

    /// Grid side (`tile_size + 1`).
    pub fn side(&self) -> usize {
        self.data.nrows()
    }

    /// Side of the source raster (`side - 1`, a power of two).
    pub fn tile_size(&self) -> usize {
        self.side() - 1
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid is empty (never true for a validated grid).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<f32> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                side: self.side(),
            })
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: f32) -> Result<()> {
        if row >= self.side() || col >= self.side() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                side: self.side(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Elevation at grid coordinates (x, y), x = column, y = row.
    ///
    /// Panics on out-of-range coordinates; traversal code only ever produces
    /// in-grid coordinates, so going outside is a programming error.
    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.data[(y, x)]
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.side() and col < self.side()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> f32 {
        unsafe { *self.data.uget((row, col)) }
    }

    /// View of the underlying data
    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }

    /// Reference to the underlying array
    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    /// Minimum and maximum elevation over the whole grid.
    pub fn min_max(&self) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in self.data.iter() {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        (min, max)
    }
}
