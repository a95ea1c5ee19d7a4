//! # relief RTIN
//!
//! Right-Triangulated Irregular Network simplification for the relief
//! terrain pipeline.
//!
//! The split into build + extract phases is the heart of the design: a
//! [`TriangleHierarchy`] is computed once per grid size, a [`Tile`] builds
//! the error map once per height grid, and any number of meshes at
//! different detail levels are then extracted from the same tile.
//!
//! ```ignore
//! use relief_rtin::{TriangleHierarchy, Tile, MeshParams, assemble};
//!
//! let hierarchy = TriangleHierarchy::new(grid.side())?;
//! let tile = Tile::new(&hierarchy, &grid)?;
//! let raw = tile.mesh(0.01)?;
//! let mesh = assemble(&raw, &grid, &MeshParams::default());
//! ```
//!
//! Or, for a single detail level, the one-shot [`triangulate`] call.

pub mod assemble;
pub mod batch;
pub mod export;
pub mod hierarchy;
mod maybe_rayon;
pub mod mesh;
pub mod pipeline;
pub mod tile;

pub use assemble::{assemble, smooth_normals, MeshParams, NoDataFilter, RenderMesh};
pub use batch::triangulate_batch;
pub use export::{write_obj, write_obj_file};
pub use hierarchy::TriangleHierarchy;
pub use mesh::RawMesh;
pub use pipeline::{triangulate, Triangulate};
pub use tile::Tile;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::assemble::{assemble, MeshParams, NoDataFilter, RenderMesh};
    pub use crate::batch::triangulate_batch;
    pub use crate::hierarchy::TriangleHierarchy;
    pub use crate::mesh::RawMesh;
    pub use crate::pipeline::{triangulate, Triangulate};
    pub use crate::tile::Tile;
    pub use relief_core::prelude::*;
}
