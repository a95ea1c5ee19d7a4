//! Per-tile error hierarchy
//!
//! A [`Tile`] pairs one height grid with the shared [`TriangleHierarchy`]
//! and precomputes, for every grid point that is the midpoint of some
//! triangle's hypotenuse, the vertical error of leaving that point out of
//! the mesh. Each stored error is the maximum of the point's own linear
//! interpolation error and the errors of the two child midpoints it
//! subsumes, so errors never decrease toward the root. That monotonicity is
//! what makes the single-pass greedy extraction in [`crate::mesh`] correct.
//!
//! Building the error map is O(grid²) and happens once; the map is then
//! read-only and serves any number of extractions at different thresholds.

use crate::hierarchy::TriangleHierarchy;
use crate::mesh::{extract_mesh, RawMesh};
use relief_core::error::{Error, Result};
use relief_core::grid::HeightGrid;

/// Error hierarchy for one height grid.
#[derive(Debug)]
pub struct Tile<'a> {
    grid: &'a HeightGrid,
    hierarchy: &'a TriangleHierarchy,
    /// Max vertical error per grid point, indexed `y * grid_size + x`
    errors: Vec<f32>,
}

impl<'a> Tile<'a> {
    /// Build the error hierarchy for `grid`.
    ///
    /// The hierarchy must have been created for the same grid size.
    pub fn new(hierarchy: &'a TriangleHierarchy, grid: &'a HeightGrid) -> Result<Self> {
        if grid.side() != hierarchy.grid_size() {
            return Err(Error::InvalidParameter {
                name: "grid",
                value: grid.side().to_string(),
                reason: format!(
                    "hierarchy was built for grid size {}",
                    hierarchy.grid_size()
                ),
            });
        }
        let mut tile = Self {
            grid,
            hierarchy,
            errors: vec![0.0; grid.len()],
        };
        tile.build_errors();
        Ok(tile)
    }

    /// One reverse pass over all triangles, finest level first, so child
    /// errors are final before their parent reads them.
    fn build_errors(&mut self) {
        let size = self.hierarchy.grid_size();
        let num_parents = self.hierarchy.num_parent_triangles();

        for i in (0..self.hierarchy.num_triangles()).rev() {
            let [ax, ay, bx, by] = self.hierarchy.triangle(i);
            let mx = (ax + bx) >> 1;
            let my = (ay + by) >> 1;
            // apex, reconstructed by rotating the half-hypotenuse
            let cx = mx + my - ay;
            let cy = my + ax - mx;

            // error of approximating the midpoint by the hypotenuse average
            let interpolated = (self.grid.at(ax, ay) + self.grid.at(bx, by)) / 2.0;
            let middle = my * size + mx;
            let middle_error = (interpolated - self.grid.at(mx, my)).abs();
            self.errors[middle] = self.errors[middle].max(middle_error);

            if i < num_parents {
                // carry up the two child midpoint errors
                let left = ((ay + cy) >> 1) * size + ((ax + cx) >> 1);
                let right = ((by + cy) >> 1) * size + ((bx + cx) >> 1);
                self.errors[middle] = self.errors[middle]
                    .max(self.errors[left])
                    .max(self.errors[right]);
            }
        }
    }

    /// The grid this tile was built from.
    pub fn grid(&self) -> &HeightGrid {
        self.grid
    }

    /// The shared triangle hierarchy.
    pub fn hierarchy(&self) -> &TriangleHierarchy {
        self.hierarchy
    }

    /// Stored error at grid coordinates (x, y).
    pub fn error_at(&self, x: usize, y: usize) -> f32 {
        self.errors[y * self.hierarchy.grid_size() + x]
    }

    /// Flat error map, indexed `y * grid_size + x`.
    pub fn errors(&self) -> &[f32] {
        &self.errors
    }

    /// Largest stored error; extraction at or above this threshold yields
    /// the coarsest two-triangle mesh.
    pub fn max_error(&self) -> f32 {
        // the roots' shared hypotenuse midpoint subsumes everything
        let half = self.hierarchy.tile_size() / 2;
        self.error_at(half, half)
    }

    /// Extract the minimal mesh whose vertical deviation from the grid
    /// stays within `max_error` everywhere.
    pub fn mesh(&self, max_error: f32) -> Result<RawMesh> {
        if !(max_error >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "max_error",
                value: max_error.to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }
        Ok(extract_mesh(
            &self.errors,
            self.hierarchy.grid_size(),
            max_error,
        ))
    }
}
