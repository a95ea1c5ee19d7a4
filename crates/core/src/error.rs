//! Error types for relief

use thiserror::Error;

/// Main error type for relief operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster shape: {width}x{height} (expected square with power-of-two side)")]
    InvalidRasterShape { width: usize, height: usize },

    #[error("Raster decode error: {0}")]
    Decode(String),

    #[error("Malformed color table row {line_no}: {line:?}")]
    MalformedColorTableRow { line_no: usize, line: String },

    #[error("Index out of bounds: ({row}, {col}) in grid of side {side}")]
    IndexOutOfBounds { row: usize, col: usize, side: usize },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for relief operations
pub type Result<T> = std::result::Result<T, Error>;
