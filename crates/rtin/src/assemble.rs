//! Mesh assembly
//!
//! Maps a grid-space [`RawMesh`](crate::mesh::RawMesh) into normalized
//! model space: the tile becomes a unit square centered on the origin in
//! the XY plane, elevations are scaled by the vertical exaggeration and
//! read back from the original height grid (not reconstructed from the
//! simplified mesh), UVs follow the raster's top-left origin, and smooth
//! per-vertex normals are accumulated from face cross products.

use crate::maybe_rayon::*;
use crate::mesh::RawMesh;
use relief_core::grid::HeightGrid;

/// No-data elevation policy.
///
/// Terrain-RGB tiles mark missing measurements with sentinel elevations;
/// leaving them in place produces spurious spikes, so matching elevations
/// are flattened to zero before exaggeration. Two sentinel conventions
/// exist in the wild, so the rule is configuration rather than a constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoDataFilter {
    /// Keep every elevation as decoded.
    Off,
    /// Flatten elevations exactly equal to the sentinel.
    Exact(f32),
    /// Flatten every elevation inside `[min, max]`. With
    /// `min = -1.0, max = f32::INFINITY` this reproduces the bathymetry
    /// variant that keeps only below-sea terrain.
    Band { min: f32, max: f32 },
}

impl NoDataFilter {
    /// Whether a raw decoded elevation is considered "no data".
    #[inline]
    pub fn matches(&self, z: f32) -> bool {
        match *self {
            NoDataFilter::Off => false,
            NoDataFilter::Exact(sentinel) => z == sentinel,
            NoDataFilter::Band { min, max } => z >= min && z <= max,
        }
    }
}

/// Parameters for triangulation and assembly
#[derive(Debug, Clone, Copy)]
pub struct MeshParams {
    /// Maximum allowed vertical deviation of the simplified mesh (>= 0)
    pub max_error: f32,
    /// Multiplier applied to normalized elevations
    pub vertical_exaggeration: f32,
    /// Constant added to every assembled z; doubles as the sea-level
    /// reference for shading
    pub z_offset: f32,
    /// Sentinel elevation handling
    pub nodata: NoDataFilter,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            max_error: 0.01,
            vertical_exaggeration: 25.0,
            z_offset: 0.25,
            nodata: NoDataFilter::Exact(255.0),
        }
    }
}

/// Renderable indexed mesh: positions, UVs and normals are index-aligned.
///
/// This is the unit handed to the rendering collaborator; the pipeline
/// keeps no ownership after handoff.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl RenderMesh {
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Assemble a raw grid-space mesh into a renderable mesh.
///
/// Grid (x, y) maps to `(0.5 - x/t, y/t - 0.5)` (unit square centered on
/// the origin) and z to `h/t * exaggeration + z_offset`, with `h` read from
/// `grid` so surviving vertices keep exact elevation fidelity.
pub fn assemble(raw: &RawMesh, grid: &HeightGrid, params: &MeshParams) -> RenderMesh {
    let t = grid.tile_size() as f32;
    let n = raw.num_vertices();

    let mapped: Vec<([f32; 3], [f32; 2])> = (0..n)
        .into_par_iter()
        .map(|i| {
            let (x, y) = raw.vertex(i);
            let mut z = grid.at(x, y);
            if params.nodata.matches(z) {
                z = 0.0;
            }
            let xf = x as f32;
            let yf = y as f32;
            let position = [
                0.5 - xf / t,
                yf / t - 0.5,
                z / t * params.vertical_exaggeration + params.z_offset,
            ];
            // v flipped: raster origin is top-left, texture origin bottom-left
            let uv = [xf / t, 1.0 - yf / t];
            (position, uv)
        })
        .collect();

    let mut positions = Vec::with_capacity(n);
    let mut uvs = Vec::with_capacity(n);
    for (p, uv) in mapped {
        positions.push(p);
        uvs.push(uv);
    }

    let normals = smooth_normals(&positions, &raw.triangles);

    RenderMesh {
        positions,
        uvs,
        normals,
        indices: raw.triangles.clone(),
    }
}

/// Area-weighted smooth normals: accumulate each face's (unnormalized)
/// cross product on its three vertices, then normalize the sums.
pub fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![[0.0f32; 3]; positions.len()];

    for tri in indices.chunks_exact(3) {
        let a = positions[tri[0] as usize];
        let b = positions[tri[1] as usize];
        let c = positions[tri[2] as usize];
        let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        // cross product magnitude is twice the face area, which gives the
        // area weighting for free
        let face = [
            ab[1] * ac[2] - ab[2] * ac[1],
            ab[2] * ac[0] - ab[0] * ac[2],
            ab[0] * ac[1] - ab[1] * ac[0],
        ];
        for &idx in tri {
            let n = &mut normals[idx as usize];
            n[0] += face[0];
            n[1] += face[1];
            n[2] += face[2];
        }
    }

    for n in &mut normals {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len > f32::EPSILON {
            n[0] /= len;
            n[1] /= len;
            n[2] /= len;
        }
    }

    normals
}
