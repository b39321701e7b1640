//! Uncompressed BMP carriers (internal).

mod decode;
mod encode;

use enough::Stop;

use crate::error::BitmapError;
use crate::grid::CarrierGrid;
use crate::limits::Limits;

/// Decode BMP data into an 8-bit carrier grid.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<CarrierGrid, BitmapError> {
    let header = decode::parse_bmp_header(data)?;
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }
    stop.check()?;
    decode::decode_bmp_pixels(data, &header, stop)
}

/// Encode to BMP.
pub(crate) fn encode(grid: &CarrierGrid, stop: &dyn Stop) -> Result<Vec<u8>, BitmapError> {
    encode::encode_bmp(grid, stop)
}
