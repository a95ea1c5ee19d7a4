//! # relief Colormap
//!
//! Elevation-to-color mapping for relief meshes: a 256-entry lookup table
//! parsed from an external tab-separated resource, plus the nonlinear
//! bucket transform and above-water discard rule used at shading time.
//!
//! ## Usage
//!
//! ```ignore
//! use relief_colormap::{ColorLut, ShadeParams, shade_mesh};
//!
//! let lut = ColorLut::parse(&std::fs::read_to_string("Deep.lut")?);
//! let colors = shade_mesh(&mesh, &lut, &ShadeParams::default());
//! ```

mod lut;
mod shade;

pub use lut::{ColorLut, Rgb, FALLBACK};
pub use shade::{bucket, shade_mesh, shade_point, PointColor, ShadeParams};
