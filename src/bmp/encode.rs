//! BMP encoder: uncompressed 24-bit and 32-bit BMP.

use enough::Stop;

use crate::error::BitmapError;
use crate::grid::{CarrierGrid, SampleDepth};

/// Encode an 8-bit grid to BMP; 32-bit when the grid carries alpha.
pub(crate) fn encode_bmp(grid: &CarrierGrid, stop: &dyn Stop) -> Result<Vec<u8>, BitmapError> {
    if grid.depth() != SampleDepth::Eight {
        return Err(BitmapError::UnsupportedVariant(format!(
            "BMP stores 8-bit samples, grid is {}-bit",
            grid.depth().bits()
        )));
    }
    let width = grid.width() as u32;
    let height = grid.height() as u32;
    let w = grid.width();
    let h = grid.height();
    let bpp: u16 = if grid.has_alpha() { 32 } else { 24 };
    let src_bpp = usize::from(bpp / 8);

    let row_stride = w
        .checked_mul(src_bpp)
        .and_then(|r| r.checked_add(3))
        .map(|r| r & !3)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    let pixel_data_size = row_stride
        .checked_mul(h)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    let file_size = pixel_data_size
        .checked_add(54)
        .filter(|&size| u32::try_from(size).is_ok())
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;

    let mut out = Vec::with_capacity(file_size);
    write_bmp_header(&mut out, file_size, pixel_data_size, width, height, bpp);

    stop.check()?;

    let pad_bytes = row_stride - w * src_bpp;
    for y in (0..h).rev() {
        if y % 16 == 0 {
            stop.check()?;
        }
        for x in 0..w {
            let px = grid.pixel(x, y);
            out.push(px.b as u8);
            out.push(px.g as u8);
            out.push(px.r as u8);
            if grid.has_alpha() {
                out.push(px.a as u8);
            }
        }
        out.extend(core::iter::repeat_n(0u8, pad_bytes));
    }

    Ok(out)
}

fn write_bmp_header(
    out: &mut Vec<u8>,
    file_size: usize,
    pixel_data_size: usize,
    width: u32,
    height: u32,
    bpp: u16,
) {
    // File header (14 bytes)
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&54u32.to_le_bytes()); // data offset

    // DIB header (BITMAPINFOHEADER, 40 bytes)
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes()); // positive = bottom-up
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&bpp.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // compression
    out.extend_from_slice(&(pixel_data_size as u32).to_le_bytes());
    out.extend_from_slice(&2835u32.to_le_bytes()); // h resolution (72 DPI)
    out.extend_from_slice(&2835u32.to_le_bytes()); // v resolution
    out.extend_from_slice(&0u32.to_le_bytes()); // colors used
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors
}
