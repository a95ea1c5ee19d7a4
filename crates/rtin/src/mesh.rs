//! Adaptive mesh extraction
//!
//! Walks the implied triangle quadtree top-down, splitting every triangle
//! whose subdivision midpoint carries more error than the caller's
//! threshold, and collects the surviving leaves as a deduplicated vertex
//! list plus index triples.
//!
//! The traversal runs twice: a counting pass that assigns each used grid
//! point its final vertex index, then a fill pass that writes vertices and
//! triangles into exactly-sized buffers. Recursion depth is bounded by
//! `2 * log2(tile_size)`, so the stack stays shallow even for 4k tiles.

/// Simplified mesh in grid space.
///
/// `vertices` holds interleaved (x, y) grid coordinates; `triangles` holds
/// counterclockwise index triples into it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMesh {
    pub vertices: Vec<u16>,
    pub triangles: Vec<u32>,
}

impl RawMesh {
    /// Number of distinct mesh vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 2
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Grid coordinates of vertex `i`.
    pub fn vertex(&self, i: usize) -> (usize, usize) {
        (self.vertices[2 * i] as usize, self.vertices[2 * i + 1] as usize)
    }
}

/// Extract the minimal triangle set satisfying `max_error`.
///
/// `errors` is the monotone error map built by [`crate::tile::Tile`],
/// indexed `y * size + x`. Called through [`crate::tile::Tile::mesh`],
/// which validates the threshold.
pub(crate) fn extract_mesh(errors: &[f32], size: usize, max_error: f32) -> RawMesh {
    let max = size - 1;
    let mut extractor = Extractor {
        errors,
        size,
        max_error,
        // vertex index + 1 per grid point; 0 marks "unused"
        indices: vec![0u32; size * size],
        num_vertices: 0,
        num_triangles: 0,
        vertices: Vec::new(),
        triangles: Vec::new(),
        tri_offset: 0,
    };

    // first pass: find used vertices and assign their indices
    extractor.count(0, 0, max, max, max, 0);
    extractor.count(max, max, 0, 0, 0, max);

    extractor.vertices = vec![0u16; extractor.num_vertices as usize * 2];
    extractor.triangles = vec![0u32; extractor.num_triangles as usize * 3];

    // second pass: emit geometry
    extractor.emit(0, 0, max, max, max, 0);
    extractor.emit(max, max, 0, 0, 0, max);

    RawMesh {
        vertices: extractor.vertices,
        triangles: extractor.triangles,
    }
}

struct Extractor<'e> {
    errors: &'e [f32],
    size: usize,
    max_error: f32,
    indices: Vec<u32>,
    num_vertices: u32,
    num_triangles: u32,
    vertices: Vec<u16>,
    triangles: Vec<u32>,
    tri_offset: usize,
}

impl Extractor<'_> {
    /// Whether triangle (a, b, c) must be split: it is still splittable
    /// (legs longer than one cell) and its midpoint error is above the
    /// threshold.
    #[inline]
    fn splits(&self, ax: usize, ay: usize, cx: usize, cy: usize, mx: usize, my: usize) -> bool {
        let leg = ax.abs_diff(cx) + ay.abs_diff(cy);
        leg > 1 && self.errors[my * self.size + mx] > self.max_error
    }

    fn count(&mut self, ax: usize, ay: usize, bx: usize, by: usize, cx: usize, cy: usize) {
        let mx = (ax + bx) >> 1;
        let my = (ay + by) >> 1;

        if self.splits(ax, ay, cx, cy, mx, my) {
            self.count(cx, cy, ax, ay, mx, my);
            self.count(bx, by, cx, cy, mx, my);
        } else {
            self.claim(ax, ay);
            self.claim(bx, by);
            self.claim(cx, cy);
            self.num_triangles += 1;
        }
    }

    #[inline]
    fn claim(&mut self, x: usize, y: usize) {
        let k = y * self.size + x;
        if self.indices[k] == 0 {
            self.num_vertices += 1;
            self.indices[k] = self.num_vertices;
        }
    }

    fn emit(&mut self, ax: usize, ay: usize, bx: usize, by: usize, cx: usize, cy: usize) {
        let mx = (ax + bx) >> 1;
        let my = (ay + by) >> 1;

        if self.splits(ax, ay, cx, cy, mx, my) {
            self.emit(cx, cy, ax, ay, mx, my);
            self.emit(bx, by, cx, cy, mx, my);
        } else {
            let a = self.indices[ay * self.size + ax] - 1;
            let b = self.indices[by * self.size + bx] - 1;
            let c = self.indices[cy * self.size + cx] - 1;

            self.vertices[2 * a as usize] = ax as u16;
            self.vertices[2 * a as usize + 1] = ay as u16;
            self.vertices[2 * b as usize] = bx as u16;
            self.vertices[2 * b as usize + 1] = by as u16;
            self.vertices[2 * c as usize] = cx as u16;
            self.vertices[2 * c as usize + 1] = cy as u16;

            self.triangles[self.tri_offset] = a;
            self.triangles[self.tri_offset + 1] = b;
            self.triangles[self.tri_offset + 2] = c;
            self.tri_offset += 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::TriangleHierarchy;
    use crate::tile::Tile;
    use relief_core::grid::HeightGrid;

    fn bumpy_grid(side: usize) -> HeightGrid {
        let mut grid = HeightGrid::new(side).unwrap();
        for y in 0..side {
            for x in 0..side {
                let v = ((x * 7 + y * 13) % 32) as f32 + ((x * y) % 5) as f32 * 3.0;
                grid.set(y, x, v).unwrap();
            }
        }
        grid
    }

    /// Strictly convex surface: every midpoint has a positive
    /// interpolation error, so nothing collapses at threshold zero.
    fn convex_grid(side: usize) -> HeightGrid {
        let mut grid = HeightGrid::new(side).unwrap();
        for y in 0..side {
            for x in 0..side {
                grid.set(y, x, (x * x + y * y) as f32).unwrap();
            }
        }
        grid
    }

    #[test]
    fn zero_threshold_keeps_every_grid_point() {
        let side = 9;
        let hierarchy = TriangleHierarchy::new(side).unwrap();
        let grid = convex_grid(side);
        let tile = Tile::new(&hierarchy, &grid).unwrap();
        let mesh = tile.mesh(0.0).unwrap();
        assert_eq!(mesh.num_vertices(), side * side);
        // full-resolution mesh: two triangles per grid cell
        assert_eq!(mesh.num_triangles(), (side - 1) * (side - 1) * 2);
    }

    #[test]
    fn infinite_threshold_yields_two_root_triangles() {
        let hierarchy = TriangleHierarchy::new(17).unwrap();
        let grid = bumpy_grid(17);
        let tile = Tile::new(&hierarchy, &grid).unwrap();

        for threshold in [f32::INFINITY, tile.max_error()] {
            let mesh = tile.mesh(threshold).unwrap();
            assert_eq!(mesh.num_triangles(), 2);
            assert_eq!(mesh.num_vertices(), 4);
            // the four corners survive
            let max = 16;
            let mut corners: Vec<_> = (0..4).map(|i| mesh.vertex(i)).collect();
            corners.sort_unstable();
            assert_eq!(corners, vec![(0, 0), (0, max), (max, 0), (max, max)]);
        }
    }

    #[test]
    fn flat_grid_collapses_at_any_positive_threshold() {
        // constant surface, tile size 2
        let hierarchy = TriangleHierarchy::new(3).unwrap();
        let grid = HeightGrid::filled(3, 645_360.0).unwrap();
        let tile = Tile::new(&hierarchy, &grid).unwrap();
        let mesh = tile.mesh(0.0).unwrap();
        // zero threshold still collapses: all errors are exactly zero
        assert_eq!(mesh.num_triangles(), 2);
        let mesh = tile.mesh(0.5).unwrap();
        assert_eq!(mesh.num_triangles(), 2);
    }

    #[test]
    fn triangle_count_monotone_in_threshold() {
        let hierarchy = TriangleHierarchy::new(33).unwrap();
        let grid = bumpy_grid(33);
        let tile = Tile::new(&hierarchy, &grid).unwrap();

        let thresholds = [0.0, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0, f32::INFINITY];
        let counts: Vec<_> = thresholds
            .iter()
            .map(|&t| tile.mesh(t).unwrap().num_triangles())
            .collect();
        for pair in counts.windows(2) {
            assert!(pair[0] >= pair[1], "counts not monotone: {counts:?}");
        }
        assert_eq!(*counts.last().unwrap(), 2);
    }

    #[test]
    fn indices_reference_valid_vertices() {
        let hierarchy = TriangleHierarchy::new(17).unwrap();
        let grid = bumpy_grid(17);
        let tile = Tile::new(&hierarchy, &grid).unwrap();
        let mesh = tile.mesh(2.0).unwrap();

        let nv = mesh.num_vertices() as u32;
        assert!(!mesh.triangles.is_empty());
        for &idx in &mesh.triangles {
            assert!(idx < nv);
        }
        // every vertex index appears in some triangle
        let mut used = vec![false; nv as usize];
        for &idx in &mesh.triangles {
            used[idx as usize] = true;
        }
        assert!(used.iter().all(|&u| u));
    }

    #[test]
    fn mesh_vertices_stay_within_grid() {
        let hierarchy = TriangleHierarchy::new(9).unwrap();
        let grid = bumpy_grid(9);
        let tile = Tile::new(&hierarchy, &grid).unwrap();
        let mesh = tile.mesh(1.0).unwrap();
        for i in 0..mesh.num_vertices() {
            let (x, y) = mesh.vertex(i);
            assert!(x <= 8 && y <= 8);
        }
    }
}
