//! Farbfeld decoder.
//!
//! Forked from zune-farbfeld 0.5.2 by Caleb Etemesi (MIT/Apache-2.0/Zlib).

use enough::Stop;
use rgb::RGBA16;

use crate::error::BitmapError;
use crate::grid::{CarrierGrid, SampleDepth};

/// Parse farbfeld header, returning (width, height).
pub(crate) fn parse_header(data: &[u8]) -> Result<(u32, u32), BitmapError> {
    if data.len() < 16 {
        return Err(BitmapError::UnexpectedEof);
    }
    if &data[0..8] != b"farbfeld" {
        return Err(BitmapError::UnrecognizedFormat);
    }
    let width = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
    let height = u32::from_be_bytes([data[12], data[13], data[14], data[15]]);

    if width == 0 {
        return Err(BitmapError::InvalidHeader("farbfeld width is zero".into()));
    }
    if height == 0 {
        return Err(BitmapError::InvalidHeader("farbfeld height is zero".into()));
    }
    Ok((width, height))
}

/// Decode big-endian RGBA16 pixels.
pub(crate) fn decode_pixels(
    data: &[u8],
    width: u32,
    height: u32,
    stop: &dyn Stop,
) -> Result<CarrierGrid, BitmapError> {
    let pixel_count = (width as usize)
        .checked_mul(height as usize)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    let input_bytes = pixel_count
        .checked_mul(8)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;

    let pixel_data = data
        .get(16..16 + input_bytes)
        .ok_or(BitmapError::UnexpectedEof)?;

    let mut out = Vec::with_capacity(pixel_count);
    let row_bytes = width as usize * 8;
    for (row_idx, row) in pixel_data.chunks_exact(row_bytes).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        for px in row.chunks_exact(8) {
            let sample = |i: usize| u16::from_be_bytes([px[i], px[i + 1]]);
            out.push(RGBA16::new(sample(0), sample(2), sample(4), sample(6)));
        }
    }

    Ok(CarrierGrid::new(
        out,
        width as usize,
        height as usize,
        SampleDepth::Sixteen,
        true,
    ))
}
