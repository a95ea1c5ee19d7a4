//! Elevation shading
//!
//! Assigns each mesh point a color from the elevation LUT through a
//! nonlinear bucket transform. Points at or above the sea-level reference
//! are "above water": they get a fixed color with zero opacity so the
//! renderer can discard them.

use crate::lut::{ColorLut, Rgb};
use relief_rtin::RenderMesh;

/// Parameters for elevation shading
#[derive(Debug, Clone, Copy)]
pub struct ShadeParams {
    /// Sea-level reference; assembled z values are measured against this.
    /// Matches the mesh's `z_offset` by convention.
    pub sea_level: f32,
    /// Fixed color for above-water points
    pub above_water: Rgb,
}

impl Default for ShadeParams {
    fn default() -> Self {
        Self {
            sea_level: 0.25,
            above_water: Rgb::new(51, 51, 255),
        }
    }
}

/// Shading outcome for one point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointColor {
    /// Below the reference: LUT color
    Surface(Rgb),
    /// At or above the reference: fixed color, suppressed opacity
    AboveWater,
}

/// Nonlinear elevation bucket: `floor((|z - sea_level| * 5)^3 * 255)`,
/// clamped to 0..=255.
#[inline]
pub fn bucket(z: f32, sea_level: f32) -> u8 {
    let h = ((z - sea_level).abs() * 5.0).powi(3) * 255.0;
    h.floor().clamp(0.0, 255.0) as u8
}

/// Shade a single assembled z value.
pub fn shade_point(z: f32, lut: &ColorLut, params: &ShadeParams) -> PointColor {
    if z >= params.sea_level {
        PointColor::AboveWater
    } else {
        PointColor::Surface(lut.color(bucket(z, params.sea_level)))
    }
}

/// Shade every vertex of a mesh.
///
/// Returns index-aligned RGBA with channels in [0, 1]; above-water points
/// carry the fixed color with alpha 0 (the discard rule), everything else
/// alpha 1.
pub fn shade_mesh(mesh: &RenderMesh, lut: &ColorLut, params: &ShadeParams) -> Vec<[f32; 4]> {
    mesh.positions
        .iter()
        .map(|p| match shade_point(p[2], lut, params) {
            PointColor::Surface(c) => {
                let [r, g, b] = c.to_f32();
                [r, g, b, 1.0]
            }
            PointColor::AboveWater => {
                let [r, g, b] = params.above_water.to_f32();
                [r, g, b, 0.0]
            }
        })
        .collect()
}
