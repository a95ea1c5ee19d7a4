//! Terrain-RGB decoding
//!
//! Turns a Mapbox Terrain-RGB raster into a [`HeightGrid`]. The encoding
//! packs elevation into the R/G/B channels with 0.1 m resolution:
//! `elevation = (r * 65536 + g * 256 + b) / 10 - 10000`.
//!
//! The triangulation needs a `(tile_size + 1)^2` grid while the raster is
//! only `tile_size^2`, so the decoder backfills the extra last row from the
//! row above it and the extra last column (corner included) from the column
//! to its left. The backfilled border is flat instead of undefined, which
//! avoids cliff artifacts at tile edges.

use crate::error::{Error, Result};
use crate::grid::{is_valid_side, HeightGrid};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Decode a single Terrain-RGB pixel to an elevation in meters.
#[inline]
pub fn decode_pixel(r: u8, g: u8, b: u8) -> f32 {
    ((r as f64 * 65536.0 + g as f64 * 256.0 + b as f64) / 10.0 - 10000.0) as f32
}

/// Inverse of [`decode_pixel`]: pack an elevation back into (R, G, B).
///
/// Exact for elevations that came out of `decode_pixel`, modulo the floor
/// rounding inherent to the 0.1 m quantization.
pub fn encode_elevation(elevation: f32) -> [u8; 3] {
    let v = ((elevation as f64 + 10000.0) * 10.0).round();
    let v = v.clamp(0.0, 16_777_215.0) as u32;
    [(v >> 16) as u8, (v >> 8) as u8, v as u8]
}

/// Build a height grid from raw interleaved pixel data.
///
/// `channels` is the number of interleaved bytes per pixel (3 for RGB,
/// 4 for RGBA; the alpha channel is ignored). The raster must be square
/// with a power-of-two side.
pub fn grid_from_pixels(
    pixels: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<HeightGrid> {
    if width != height || !is_valid_side(width + 1) {
        return Err(Error::InvalidRasterShape { width, height });
    }
    if channels < 3 {
        return Err(Error::Decode(format!(
            "expected at least 3 channels per pixel, got {channels}"
        )));
    }
    if pixels.len() < width * height * channels {
        return Err(Error::Decode(format!(
            "pixel buffer too short: {} bytes for {width}x{height}x{channels}",
            pixels.len()
        )));
    }

    let tile_size = width;
    let grid_size = tile_size + 1;
    let mut terrain = vec![0.0f32; grid_size * grid_size];

    // decode terrain values
    for y in 0..tile_size {
        for x in 0..tile_size {
            let k = (y * tile_size + x) * channels;
            terrain[y * grid_size + x] = decode_pixel(pixels[k], pixels[k + 1], pixels[k + 2]);
        }
    }
    // backfill right and bottom borders
    for x in 0..grid_size - 1 {
        terrain[grid_size * (grid_size - 1) + x] = terrain[grid_size * (grid_size - 2) + x];
    }
    for y in 0..grid_size {
        terrain[grid_size * y + grid_size - 1] = terrain[grid_size * y + grid_size - 2];
    }

    HeightGrid::from_vec(terrain, grid_size)
}

/// Read a Terrain-RGB PNG file into a height grid.
pub fn read_terrain_png<P: AsRef<Path>>(path: P) -> Result<HeightGrid> {
    let file = File::open(path.as_ref())?;
    decode_png(BufReader::new(file))
}

/// Decode a Terrain-RGB PNG from an in-memory buffer.
///
/// Same as [`read_terrain_png`] but operates on a byte slice, for callers
/// that fetch tiles themselves.
pub fn decode_terrain_png(data: &[u8]) -> Result<HeightGrid> {
    decode_png(data)
}

/// Internal: decode a PNG from any `Read` source
fn decode_png<R: Read>(reader: R) -> Result<HeightGrid> {
    let decoder = png::Decoder::new(reader);
    let mut reader = decoder
        .read_info()
        .map_err(|e| Error::Decode(format!("PNG header: {e}")))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| Error::Decode(format!("PNG data: {e}")))?;

    if info.bit_depth != png::BitDepth::Eight {
        return Err(Error::Decode(format!(
            "expected 8-bit channels, got {:?}",
            info.bit_depth
        )));
    }
    let channels = match info.color_type {
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(Error::Decode(format!(
                "expected RGB or RGBA pixels, got {other:?}"
            )))
        }
    };

    grid_from_pixels(
        &buf[..info.buffer_size()],
        info.width as usize,
        info.height as usize,
        channels,
    )
}
