//! Tile-level parallelism
//!
//! Tiles are independent: each pipeline invocation owns its output until
//! handoff, so a batch of tiles fans out across cores with no shared
//! mutable state. Tiles of equal size could share one `TriangleHierarchy`;
//! mixed batches are allowed, so each invocation builds its own.

use crate::assemble::{MeshParams, RenderMesh};
use crate::maybe_rayon::*;
use crate::pipeline::triangulate;
use relief_core::error::Result;
use relief_core::grid::HeightGrid;

/// Run the full pipeline over many independent tiles in parallel.
///
/// Output order matches input order. The first failing tile aborts the
/// batch and its error is returned.
pub fn triangulate_batch(grids: &[HeightGrid], params: &MeshParams) -> Result<Vec<RenderMesh>> {
    grids
        .into_par_iter()
        .map(|grid| triangulate(grid, params))
        .collect()
}
