//! # relief Core
//!
//! Core types and Terrain-RGB decoding for the relief terrain-mesh pipeline.
//!
//! This crate provides:
//! - `HeightGrid`: square elevation grid of side `2^n + 1`
//! - Terrain-RGB decoding (from raw pixels, a PNG buffer, or a PNG file)
//! - The `Algorithm` trait implemented by pipeline stages
//! - Shared error types

pub mod decode;
pub mod error;
pub mod grid;

pub use decode::{decode_terrain_png, grid_from_pixels, read_terrain_png};
pub use error::{Error, Result};
pub use grid::HeightGrid;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::decode::{decode_terrain_png, grid_from_pixels, read_terrain_png};
    pub use crate::error::{Error, Result};
    pub use crate::grid::HeightGrid;
    pub use crate::Algorithm;
}

/// Core trait for pipeline stages in relief.
///
/// Stages are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
