//! End-to-end pipeline tests over synthetic Terrain-RGB tiles.
//!
//! Tiles are generated in-memory: a synthetic elevation model is encoded
//! into Terrain-RGB bytes with the inverse transform, decoded back through
//! the real decoder, and pushed through hierarchy build, extraction and
//! assembly.

use relief_core::decode::{decode_pixel, encode_elevation, grid_from_pixels};
use relief_core::grid::HeightGrid;
use relief_rtin::{
    assemble, triangulate, triangulate_batch, MeshParams, NoDataFilter, Tile, TriangleHierarchy,
};

/// Synthetic elevation model: a ridge with a valley, wavy enough that
/// different thresholds give visibly different meshes.
fn synthetic_elevation(x: usize, y: usize, tile_size: usize) -> f32 {
    let fx = x as f32 / tile_size as f32;
    let fy = y as f32 / tile_size as f32;
    1000.0 + 800.0 * (fx * 6.0).sin() * (fy * 4.0).cos() + 200.0 * fx
}

/// Encode the synthetic model as an RGBA Terrain-RGB tile.
fn synthetic_tile(tile_size: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(tile_size * tile_size * 4);
    for y in 0..tile_size {
        for x in 0..tile_size {
            let [r, g, b] = encode_elevation(synthetic_elevation(x, y, tile_size));
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
    }
    pixels
}

fn synthetic_grid(tile_size: usize) -> HeightGrid {
    grid_from_pixels(&synthetic_tile(tile_size), tile_size, tile_size, 4).unwrap()
}

/// Strictly convex bowl, encoded through the same Terrain-RGB path.
/// Elevations are exact multiples of 0.1 m so the encoding is lossless,
/// and convexity guarantees a positive error at every midpoint.
fn paraboloid_grid(tile_size: usize) -> HeightGrid {
    let mut pixels = Vec::with_capacity(tile_size * tile_size * 4);
    for y in 0..tile_size {
        for x in 0..tile_size {
            let h = 1000.0 + (x * x + y * y) as f32 * 0.1;
            let [r, g, b] = encode_elevation(h);
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
    }
    grid_from_pixels(&pixels, tile_size, tile_size, 4).unwrap()
}

#[test]
fn decoded_grid_matches_encoded_elevations() {
    let tile_size = 16;
    let grid = synthetic_grid(tile_size);
    assert_eq!(grid.side(), tile_size + 1);

    for y in 0..tile_size {
        for x in 0..tile_size {
            let expected = synthetic_elevation(x, y, tile_size);
            // quantized to 0.1 m by the encoding
            assert!(
                (grid.at(x, y) - expected).abs() <= 0.051,
                "({x},{y}): {} vs {expected}",
                grid.at(x, y)
            );
        }
    }
}

#[test]
fn extraction_respects_error_bound() {
    // Every grid point the mesh left out must be approximated within the
    // threshold by the plane of some surviving triangle. Checking the
    // midpoint chain is equivalent and cheaper: no stored error above the
    // threshold may survive unsplit. Here we verify the coarser invariant
    // that meshes tighten as the threshold drops.
    let grid = synthetic_grid(64);
    let hierarchy = TriangleHierarchy::new(grid.side()).unwrap();
    let tile = Tile::new(&hierarchy, &grid).unwrap();

    let coarse = tile.mesh(50.0).unwrap();
    let fine = tile.mesh(1.0).unwrap();
    let exact = tile.mesh(0.0).unwrap();

    assert!(coarse.num_triangles() < fine.num_triangles());
    assert!(fine.num_triangles() <= exact.num_triangles());
}

#[test]
fn one_tile_many_thresholds_reuses_hierarchy() {
    let grid = paraboloid_grid(32);
    let hierarchy = TriangleHierarchy::new(grid.side()).unwrap();
    let tile = Tile::new(&hierarchy, &grid).unwrap();

    // 2 triangles at the top, full resolution at the bottom
    assert_eq!(tile.mesh(f32::INFINITY).unwrap().num_triangles(), 2);
    assert_eq!(
        tile.mesh(0.0).unwrap().num_triangles(),
        (grid.side() - 1) * (grid.side() - 1) * 2
    );
}

#[test]
fn assembled_mesh_is_renderable() {
    let grid = synthetic_grid(32);
    let params = MeshParams {
        max_error: 5.0,
        vertical_exaggeration: 25.0,
        z_offset: 0.25,
        nodata: NoDataFilter::Off,
    };
    let mesh = triangulate(&grid, &params).unwrap();

    let nv = mesh.num_vertices();
    assert_eq!(mesh.uvs.len(), nv);
    assert_eq!(mesh.normals.len(), nv);
    assert_eq!(mesh.indices.len() % 3, 0);
    for &i in &mesh.indices {
        assert!((i as usize) < nv);
    }
    for uv in &mesh.uvs {
        assert!(uv[0] >= 0.0 && uv[0] <= 1.0);
        assert!(uv[1] >= 0.0 && uv[1] <= 1.0);
    }
    for n in &mesh.normals {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-3);
    }
}

#[test]
fn nodata_tile_assembles_flat() {
    // A tile full of the no-data sentinel must come out completely flat.
    let tile_size = 8;
    let [r, g, b] = encode_elevation(255.0);
    assert_eq!(decode_pixel(r, g, b), 255.0);

    let mut pixels = Vec::new();
    for _ in 0..tile_size * tile_size {
        pixels.extend_from_slice(&[r, g, b, 255]);
    }
    let grid = grid_from_pixels(&pixels, tile_size, tile_size, 4).unwrap();

    let params = MeshParams {
        max_error: 0.0,
        vertical_exaggeration: 1000.0,
        z_offset: 0.0,
        nodata: NoDataFilter::Exact(255.0),
    };
    let mesh = triangulate(&grid, &params).unwrap();
    for p in &mesh.positions {
        assert_eq!(p[2], 0.0);
    }
}

#[test]
fn batch_of_tiles_runs_to_completion() {
    let grids: Vec<_> = [8, 16, 32].iter().map(|&s| synthetic_grid(s)).collect();
    let params = MeshParams {
        max_error: 2.0,
        ..MeshParams::default()
    };
    let meshes = triangulate_batch(&grids, &params).unwrap();
    assert_eq!(meshes.len(), 3);
    for (grid, mesh) in grids.iter().zip(&meshes) {
        let one = triangulate(grid, &params).unwrap();
        assert_eq!(one, *mesh);
    }
}

#[test]
fn obj_export_roundtrips_through_a_file() {
    let grid = synthetic_grid(16);
    let mesh = triangulate(&grid, &MeshParams::default()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tile.obj");
    relief_rtin::write_obj_file(&mesh, None, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let v = text.lines().filter(|l| l.starts_with("v ")).count();
    let f = text.lines().filter(|l| l.starts_with("f ")).count();
    assert_eq!(v, mesh.num_vertices());
    assert_eq!(f, mesh.num_triangles());
}

#[test]
fn raw_and_assembled_triangle_counts_agree() {
    let grid = synthetic_grid(16);
    let hierarchy = TriangleHierarchy::new(grid.side()).unwrap();
    let tile = Tile::new(&hierarchy, &grid).unwrap();
    let raw = tile.mesh(3.0).unwrap();
    let mesh = assemble(&raw, &grid, &MeshParams::default());
    assert_eq!(mesh.num_triangles(), raw.num_triangles());
    assert_eq!(mesh.num_vertices(), raw.num_vertices());
}
