//! Precomputed triangle hierarchy
//!
//! An RTIN mesh over a `(2^n + 1)^2` grid is drawn from a fixed set of
//! `2 * tile^2 - 2` right triangles: two roots covering the square, each
//! recursively split along the perpendicular bisector of its hypotenuse.
//! This module enumerates them once per grid size, as a flat array instead
//! of a pointer tree: triangle `i` has id `i + 2`, and the id's binary
//! digits encode the left/right path from the root, so the two hypotenuse
//! endpoints can be replayed from the id alone.
//!
//! The hierarchy depends only on the grid size, so one instance is shared
//! across every tile of that size.

use relief_core::error::{Error, Result};
use relief_core::grid::is_valid_side;

/// All implied right triangles for one grid size.
///
/// For each triangle only the hypotenuse endpoints `(a, b)` are stored; the
/// apex and the midpoint follow from them by index arithmetic.
#[derive(Debug, Clone)]
pub struct TriangleHierarchy {
    grid_size: usize,
    num_triangles: usize,
    num_parent_triangles: usize,
    /// (ax, ay, bx, by) per triangle
    coords: Vec<u16>,
}

impl TriangleHierarchy {
    /// Enumerate the triangle hierarchy for grids of side `grid_size`.
    ///
    /// Fails unless `grid_size == 2^n + 1` with `n >= 1`, or if the grid is
    /// too large for 16-bit vertex coordinates.
    pub fn new(grid_size: usize) -> Result<Self> {
        if !is_valid_side(grid_size) {
            return Err(Error::InvalidRasterShape {
                width: grid_size,
                height: grid_size,
            });
        }
        let tile_size = grid_size - 1;
        if tile_size > u16::MAX as usize {
            return Err(Error::InvalidParameter {
                name: "grid_size",
                value: grid_size.to_string(),
                reason: "tile side must fit in 16-bit coordinates".to_string(),
            });
        }

        let num_triangles = tile_size * tile_size * 2 - 2;
        let num_parent_triangles = num_triangles - tile_size * tile_size;
        let mut coords = vec![0u16; num_triangles * 4];

        // Replay each triangle id's bit path from its root. Ids 2 and 3 are
        // the two roots; appending a bit picks the left or right child.
        let t = tile_size as i32;
        for i in 0..num_triangles {
            let mut id = i + 2;
            let (mut ax, mut ay, mut bx, mut by, mut cx, mut cy) = (0i32, 0, 0, 0, 0, 0);
            if id & 1 != 0 {
                // bottom-left triangle
                bx = t;
                by = t;
                cx = t;
            } else {
                // top-right triangle
                ax = t;
                ay = t;
                cy = t;
            }
            loop {
                id >>= 1;
                if id <= 1 {
                    break;
                }
                let mx = (ax + bx) >> 1;
                let my = (ay + by) >> 1;
                if id & 1 != 0 {
                    // left half
                    bx = ax;
                    by = ay;
                    ax = cx;
                    ay = cy;
                } else {
                    // right half
                    ax = bx;
                    ay = by;
                    bx = cx;
                    by = cy;
                }
                cx = mx;
                cy = my;
            }
            let k = i * 4;
            coords[k] = ax as u16;
            coords[k + 1] = ay as u16;
            coords[k + 2] = bx as u16;
            coords[k + 3] = by as u16;
        }

        Ok(Self {
            grid_size,
            num_triangles,
            num_parent_triangles,
            coords,
        })
    }

    /// Grid side this hierarchy was built for.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Side of the underlying tile (`grid_size - 1`).
    pub fn tile_size(&self) -> usize {
        self.grid_size - 1
    }

    /// Total number of triangles across all subdivision levels.
    pub fn num_triangles(&self) -> usize {
        self.num_triangles
    }

    /// Number of non-leaf triangles (those with two children).
    pub fn num_parent_triangles(&self) -> usize {
        self.num_parent_triangles
    }

    /// Hypotenuse endpoints (ax, ay, bx, by) of triangle `i`.
    #[inline]
    pub fn triangle(&self, i: usize) -> [usize; 4] {
        let k = i * 4;
        [
            self.coords[k] as usize,
            self.coords[k + 1] as usize,
            self.coords[k + 2] as usize,
            self.coords[k + 3] as usize,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_grid_size() {
        assert!(TriangleHierarchy::new(4).is_err());
        assert!(TriangleHierarchy::new(0).is_err());
        assert!(TriangleHierarchy::new(2).is_err());
    }

    #[test]
    fn triangle_counts() {
        // tile 2 -> 2*4 - 2 = 6 triangles total, 2 of them parents
        let h = TriangleHierarchy::new(3).unwrap();
        assert_eq!(h.num_triangles(), 6);
        assert_eq!(h.num_parent_triangles(), 2);

        let h = TriangleHierarchy::new(5).unwrap();
        assert_eq!(h.num_triangles(), 30);
        assert_eq!(h.num_parent_triangles(), 14);
    }

    #[test]
    fn roots_cover_the_square() {
        let h = TriangleHierarchy::new(5).unwrap();
        // Triangles 0 and 1 (ids 2 and 3) are the roots; their hypotenuses
        // are the two orientations of the main diagonal.
        let a = h.triangle(0);
        let b = h.triangle(1);
        assert_eq!(a, [4, 4, 0, 0]);
        assert_eq!(b, [0, 0, 4, 4]);
    }

    #[test]
    fn all_coordinates_in_grid() {
        let h = TriangleHierarchy::new(9).unwrap();
        for i in 0..h.num_triangles() {
            let [ax, ay, bx, by] = h.triangle(i);
            for v in [ax, ay, bx, by] {
                assert!(v <= 8, "triangle {i} has out-of-grid coordinate {v}");
            }
            // hypotenuse endpoints are never degenerate
            assert!(ax != bx || ay != by);
        }
    }
}
