//! PNM carriers: P6 (PPM) and P7 (PAM).
//!
//! Only color tuple types are accepted (RGB, RGB_ALPHA), at maxval 255 or
//! 65535. Other maxvals would be rescaled on output, which changes samples.
//!
//! Credits: Header handling draws from [zune-ppm](https://github.com/etemesi254/zune-image)
//! by Caleb Etemesi (MIT/Apache-2.0/Zlib licensed).

mod decode;
mod encode;

use enough::Stop;

use crate::error::BitmapError;
use crate::grid::{CarrierGrid, SampleDepth};
use crate::limits::Limits;

/// Which PNM sub-format to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PnmFormat {
    /// P6, binary RGB (PPM).
    Ppm,
    /// P7, PAM with TUPLTYPE header.
    Pam,
}

/// Parsed PNM header (internal).
pub(crate) struct PnmHeader {
    pub width: u32,
    pub height: u32,
    pub depth: SampleDepth,
    /// Samples per pixel: 3 or 4.
    pub channels: usize,
    pub data_offset: usize,
}

/// Decode PPM or PAM data into a carrier grid.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<CarrierGrid, BitmapError> {
    let header = decode::parse_header(data)?;
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }
    stop.check()?;
    let pixel_data = data
        .get(header.data_offset..)
        .ok_or(BitmapError::UnexpectedEof)?;
    decode::decode_samples(pixel_data, &header, stop)
}

/// Encode a carrier grid as PPM or PAM at the grid's own sample depth.
pub(crate) fn encode(
    grid: &CarrierGrid,
    format: PnmFormat,
    stop: &dyn Stop,
) -> Result<Vec<u8>, BitmapError> {
    encode::encode_pnm(grid, format, stop)
}
