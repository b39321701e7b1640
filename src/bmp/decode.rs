//! BMP decoder for uncompressed 24-bit and 32-bit bitmaps.
//!
//! Palette, RLE and sub-byte depths are rejected: a carrier rewritten by the
//! encoder must come back with the very same samples, and those variants do
//! not round-trip through the 24/32-bit writer.

use enough::Stop;
use rgb::RGBA16;

use crate::error::BitmapError;
use crate::grid::{CarrierGrid, SampleDepth};

const BI_RGB: u32 = 0;
const BI_BITFIELDS: u32 = 3;
const BI_ALPHABITFIELDS: u32 = 6;

/// Masks of a 32-bit BGRA pixel.
const BGRA_MASKS: [u32; 3] = [0x00FF_0000, 0x0000_FF00, 0x0000_00FF];

// ── Cursor for reading from &[u8] ───────────────────────────────────

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], BitmapError> {
        let end = self.pos.checked_add(N).ok_or(BitmapError::UnexpectedEof)?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(BitmapError::UnexpectedEof)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(bytes);
        self.pos = end;
        Ok(buf)
    }

    fn get_u16_le_err(&mut self) -> Result<u16, BitmapError> {
        Ok(u16::from_le_bytes(self.read_fixed_bytes()?))
    }

    fn get_u32_le_err(&mut self) -> Result<u32, BitmapError> {
        Ok(u32::from_le_bytes(self.read_fixed_bytes()?))
    }

    fn get_i32_le_err(&mut self) -> Result<i32, BitmapError> {
        Ok(i32::from_le_bytes(self.read_fixed_bytes()?))
    }
}

// ── Parsed BMP header info ──────────────────────────────────────────

pub(crate) struct BmpHeader {
    pub width: u32,
    pub height: u32,
    pub top_down: bool,
    pub bpp: u16,
    pub data_offset: usize,
}

/// Parse file and DIB headers.
pub(crate) fn parse_bmp_header(data: &[u8]) -> Result<BmpHeader, BitmapError> {
    let mut bytes = Cursor::new(data);
    if bytes.read_fixed_bytes::<2>()? != *b"BM" {
        return Err(BitmapError::UnrecognizedFormat);
    }
    let _file_size = bytes.get_u32_le_err()?;
    let _reserved = bytes.get_u32_le_err()?;
    let data_offset = bytes.get_u32_le_err()? as usize;

    let ihsize = bytes.get_u32_le_err()?;
    if ihsize < 40 {
        return Err(BitmapError::UnsupportedVariant(format!(
            "BMP info header of {ihsize} bytes (OS/2 bitmaps are not carriers)"
        )));
    }
    let width = bytes.get_i32_le_err()?;
    let height = bytes.get_i32_le_err()?;
    let planes = bytes.get_u16_le_err()?;
    let bpp = bytes.get_u16_le_err()?;
    let compression = bytes.get_u32_le_err()?;

    if planes != 1 {
        return Err(BitmapError::InvalidHeader(format!(
            "BMP planes must be 1, got {planes}"
        )));
    }
    if width <= 0 || height == 0 || height == i32::MIN {
        return Err(BitmapError::InvalidHeader(format!(
            "invalid BMP dimensions {width}x{height}"
        )));
    }
    if bpp != 24 && bpp != 32 {
        return Err(BitmapError::UnsupportedVariant(format!(
            "{bpp}-bit BMP (only 24-bit and 32-bit are carriers)"
        )));
    }

    match compression {
        BI_RGB => {}
        BI_BITFIELDS | BI_ALPHABITFIELDS if bpp == 32 => {
            // Masks sit right after the 40-byte info header for both
            // BITMAPINFOHEADER and the V4/V5 headers.
            let mut masks = Cursor::new(data);
            masks.pos = 14 + 40;
            let rgb = [
                masks.get_u32_le_err()?,
                masks.get_u32_le_err()?,
                masks.get_u32_le_err()?,
            ];
            if rgb != BGRA_MASKS {
                return Err(BitmapError::UnsupportedVariant(format!(
                    "BMP bitfield masks {rgb:08x?}"
                )));
            }
        }
        other => {
            return Err(BitmapError::UnsupportedVariant(format!(
                "BMP compression {other}"
            )));
        }
    }

    Ok(BmpHeader {
        width: width as u32,
        height: height.unsigned_abs(),
        top_down: height < 0,
        bpp,
        data_offset,
    })
}

/// Decode the pixel array described by `header`.
pub(crate) fn decode_bmp_pixels(
    data: &[u8],
    header: &BmpHeader,
    stop: &dyn Stop,
) -> Result<CarrierGrid, BitmapError> {
    let w = header.width as usize;
    let h = header.height as usize;
    let src_bpp = usize::from(header.bpp / 8);
    let too_large = || BitmapError::DimensionsTooLarge {
        width: header.width,
        height: header.height,
    };
    let row_stride = w
        .checked_mul(src_bpp)
        .and_then(|r| r.checked_add(3))
        .map(|r| r & !3)
        .ok_or_else(too_large)?;
    let pixel_bytes = row_stride.checked_mul(h).ok_or_else(too_large)?;
    let end = header
        .data_offset
        .checked_add(pixel_bytes)
        .ok_or_else(too_large)?;
    let raster = data
        .get(header.data_offset..end)
        .ok_or(BitmapError::UnexpectedEof)?;

    let has_alpha = header.bpp == 32;
    let mut out = vec![RGBA16::new(0, 0, 0, 0); w * h];
    for (file_row, row) in raster.chunks_exact(row_stride).enumerate() {
        if file_row % 16 == 0 {
            stop.check()?;
        }
        let y = if header.top_down {
            file_row
        } else {
            h - 1 - file_row
        };
        let dst = &mut out[y * w..(y + 1) * w];
        for (px, src) in dst.iter_mut().zip(row.chunks_exact(src_bpp)) {
            let a = if has_alpha { src[3] } else { 0xFF };
            *px = RGBA16::new(
                u16::from(src[2]),
                u16::from(src[1]),
                u16::from(src[0]),
                u16::from(a),
            );
        }
    }

    Ok(CarrierGrid::new(out, w, h, SampleDepth::Eight, has_alpha))
}
