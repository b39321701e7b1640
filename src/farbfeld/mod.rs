//! Farbfeld carriers (internal).
//!
//! Farbfeld is a simple lossless format: 8-byte magic ("farbfeld"),
//! width/height as u32 big-endian, then RGBA u16 big-endian pixels.
//!
//! Implementation draws from [zune-farbfeld](https://github.com/etemesi254/zune-image)
//! by Caleb Etemesi (MIT/Apache-2.0/Zlib licensed).

pub(crate) mod decode;
mod encode;

use enough::Stop;

use crate::error::BitmapError;
use crate::grid::CarrierGrid;
use crate::limits::Limits;

/// Decode farbfeld data to a 16-bit carrier grid.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<CarrierGrid, BitmapError> {
    let (width, height) = decode::parse_header(data)?;
    if let Some(limits) = limits {
        limits.check(width, height)?;
    }
    stop.check()?;
    decode::decode_pixels(data, width, height, stop)
}

/// Encode a carrier grid as farbfeld.
pub(crate) fn encode(grid: &CarrierGrid, stop: &dyn Stop) -> Result<Vec<u8>, BitmapError> {
    encode::encode_farbfeld(grid, stop)
}
