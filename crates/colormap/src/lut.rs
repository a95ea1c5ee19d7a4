//! Elevation color lookup table
//!
//! Parsed from an external tab-separated table of `index\tR\tG\tB` rows
//! (header line first). The table indexes run opposite to the shading
//! buckets, so row `i` lands in slot `255 - i`. Rows that fail to parse
//! are skipped with a warning; a partial table with the fallback color in
//! the gaps is still usable.

use relief_core::error::Error;
use tracing::warn;

/// RGB color with 0..=255 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels normalized to [0, 1].
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// Fallback for table slots no row specified.
pub const FALLBACK: Rgb = Rgb::new(255, 255, 255);

/// 256-entry bucket-to-color table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorLut {
    table: [Rgb; 256],
}

impl Default for ColorLut {
    fn default() -> Self {
        Self::uniform(FALLBACK)
    }
}

impl ColorLut {
    /// Table with every slot set to one color.
    pub fn uniform(color: Rgb) -> Self {
        Self {
            table: [color; 256],
        }
    }

    /// Parse a tab-separated color table.
    ///
    /// The first line is a header and is ignored. Each following non-empty
    /// line must be `index\tR\tG\tB` with all values in 0..=255; row `i`
    /// fills slot `255 - i`. Malformed rows are skipped with a warning
    /// rather than failing the whole table.
    pub fn parse(text: &str) -> Self {
        let mut lut = Self::default();

        for (line_no, line) in text.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            match parse_row(line) {
                Some((index, color)) => {
                    lut.table[255 - index as usize] = color;
                }
                None => {
                    let err = Error::MalformedColorTableRow {
                        line_no: line_no + 1,
                        line: line.to_string(),
                    };
                    warn!("skipping color table row: {err}");
                }
            }
        }

        lut
    }

    /// Color for an elevation bucket.
    #[inline]
    pub fn color(&self, bucket: u8) -> Rgb {
        self.table[bucket as usize]
    }
}

/// Parse one `index\tR\tG\tB` row. R/G/B may carry a fractional part in
/// the wild; they are rounded into 0..=255.
fn parse_row(line: &str) -> Option<(u8, Rgb)> {
    let mut fields = line.split('\t');
    let index = fields.next()?.trim().parse::<u8>().ok()?;

    let mut channel = || -> Option<u8> {
        let v = fields.next()?.trim().parse::<f32>().ok()?;
        if !(0.0..=255.0).contains(&v) {
            return None;
        }
        Some(v.round() as u8)
    };
    let r = channel()?;
    let g = channel()?;
    let b = channel()?;
    Some((index, Rgb::new(r, g, b)))
}
