//! One-shot triangulation pipeline
//!
//! Ties the stages together: error hierarchy build, extraction at the
//! requested threshold, and assembly into a renderable mesh. The whole
//! pipeline is synchronous and pure; callers wanting responsiveness run it
//! off their scheduling thread and receive the finished mesh as one unit.

use crate::assemble::{assemble, MeshParams, RenderMesh};
use crate::hierarchy::TriangleHierarchy;
use crate::tile::Tile;
use relief_core::error::{Error, Result};
use relief_core::grid::HeightGrid;
use relief_core::Algorithm;

/// Produce a renderable mesh from a height grid.
///
/// Builds the error hierarchy for this grid and extracts once. Callers that
/// need several detail levels of the same grid should build a [`Tile`]
/// themselves and call [`Tile::mesh`] per threshold instead of paying the
/// O(grid²) hierarchy build each time.
pub fn triangulate(grid: &HeightGrid, params: &MeshParams) -> Result<RenderMesh> {
    let hierarchy = TriangleHierarchy::new(grid.side())?;
    let tile = Tile::new(&hierarchy, grid)?;
    let raw = tile.mesh(params.max_error)?;
    Ok(assemble(&raw, grid, params))
}

/// RTIN triangulation as an [`Algorithm`]
#[derive(Debug, Clone, Default)]
pub struct Triangulate;

impl Algorithm for Triangulate {
    type Input = HeightGrid;
    type Output = RenderMesh;
    type Params = MeshParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Triangulate"
    }

    fn description(&self) -> &'static str {
        "Adaptively simplify a height grid into a renderable RTIN mesh under an error bound"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        triangulate(&input, &params)
    }
}
