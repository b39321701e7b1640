//! QOI carriers via [rapid-qoi](https://crates.io/crates/rapid-qoi).

use enough::Stop;
use rapid_qoi::{Colors, Qoi};
use rgb::RGBA16;

use crate::error::BitmapError;
use crate::grid::{CarrierGrid, ColorEncoding, SampleDepth};
use crate::limits::Limits;

/// 14-byte header plus the 8-byte end marker.
const FRAMING_BYTES: usize = 14 + 8;
/// Longest run a single one-byte QOI op can cover.
const MAX_RUN: u64 = 62;

fn has_alpha(colors: Colors) -> bool {
    matches!(colors, Colors::Rgba | Colors::SrgbLinA)
}

fn encoding(colors: Colors) -> ColorEncoding {
    match colors {
        Colors::Srgb | Colors::SrgbLinA => ColorEncoding::Srgb,
        Colors::Rgb | Colors::Rgba => ColorEncoding::Linear,
    }
}

fn qoi_colors(has_alpha: bool, encoding: ColorEncoding) -> Colors {
    match (has_alpha, encoding) {
        (false, ColorEncoding::Srgb) => Colors::Srgb,
        (true, ColorEncoding::Srgb) => Colors::SrgbLinA,
        (false, ColorEncoding::Linear) => Colors::Rgb,
        (true, ColorEncoding::Linear) => Colors::Rgba,
    }
}

pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<CarrierGrid, BitmapError> {
    let header = Qoi::decode_header(data)
        .map_err(|e| BitmapError::InvalidHeader(format!("QOI: {e:?}")))?;
    if header.width == 0 || header.height == 0 {
        return Err(BitmapError::InvalidHeader(format!(
            "zero dimension {}x{}",
            header.width, header.height
        )));
    }
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }

    // The decoder sizes its output from the header alone, so the header has
    // to be bounded by the input before it gets that far.
    let too_large = || BitmapError::DimensionsTooLarge {
        width: header.width,
        height: header.height,
    };
    let channels = if has_alpha(header.colors) { 4 } else { 3 };
    let pixel_count = (header.width as usize)
        .checked_mul(header.height as usize)
        .ok_or_else(too_large)?;
    pixel_count.checked_mul(channels).ok_or_else(too_large)?;
    let reachable = (data.len().saturating_sub(FRAMING_BYTES) as u64).saturating_mul(MAX_RUN);
    if pixel_count as u64 > reachable {
        return Err(BitmapError::UnexpectedEof);
    }
    stop.check()?;

    let (qoi, pixels) =
        Qoi::decode_alloc(data).map_err(|e| BitmapError::InvalidData(format!("QOI: {e:?}")))?;
    let alpha = has_alpha(qoi.colors);
    let channels = if alpha { 4 } else { 3 };
    let w = qoi.width as usize;
    let h = qoi.height as usize;
    if pixels.len() < w * h * channels {
        return Err(BitmapError::UnexpectedEof);
    }

    let out = pixels
        .chunks_exact(channels)
        .take(w * h)
        .map(|px| {
            let a = if alpha { px[3] } else { 0xFF };
            RGBA16::new(
                u16::from(px[0]),
                u16::from(px[1]),
                u16::from(px[2]),
                u16::from(a),
            )
        })
        .collect();
    Ok(CarrierGrid::new(out, w, h, SampleDepth::Eight, alpha)
        .with_encoding(encoding(qoi.colors)))
}

pub(crate) fn encode(grid: &CarrierGrid, stop: &dyn Stop) -> Result<Vec<u8>, BitmapError> {
    let width = grid.width() as u32;
    let height = grid.height() as u32;
    if grid.depth() != SampleDepth::Eight {
        return Err(BitmapError::UnsupportedVariant(format!(
            "QOI stores 8-bit samples, grid is {}-bit",
            grid.depth().bits()
        )));
    }
    let colors = qoi_colors(grid.has_alpha(), grid.encoding());
    let channels = if grid.has_alpha() { 4 } else { 3 };

    let mut raw = Vec::with_capacity(grid.width() * grid.height() * channels);
    for (i, px) in grid.pixels().enumerate() {
        if i % grid.width().saturating_mul(16).max(1) == 0 {
            stop.check()?;
        }
        let samples = [px.r as u8, px.g as u8, px.b as u8, px.a as u8];
        raw.extend_from_slice(&samples[..channels]);
    }

    Qoi {
        width,
        height,
        colors,
    }
    .encode_alloc(&raw)
    .map_err(|e| BitmapError::InvalidData(format!("QOI: {e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    #[test]
    fn roundtrip_rgb_and_rgba() {
        for alpha in [false, true] {
            let grid = CarrierGrid::from_fn(7, 5, SampleDepth::Eight, alpha, |x, y| {
                RGBA16::new((x * 31) as u16, (y * 47) as u16, ((x ^ y) * 13) as u16, 255)
            });
            let encoded = encode(&grid, &Unstoppable).unwrap();
            assert_eq!(&encoded[..4], b"qoif");
            assert_eq!(decode(&encoded, None, &Unstoppable).unwrap(), grid);
        }
    }

    #[test]
    fn garbage_is_a_container_error() {
        assert!(decode(b"qoif\0\0", None, &Unstoppable).is_err());
    }

    fn bare_header(width: u32, height: u32, channels: u8, colorspace: u8) -> Vec<u8> {
        let mut data = b"qoif".to_vec();
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[channels, colorspace]);
        data
    }

    #[test]
    fn overflowing_header_is_rejected() {
        let mut data = bare_header(0x8000_0000, 0x8000_0000, 4, 0);
        data.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
        assert!(matches!(
            decode(&data, None, &Unstoppable),
            Err(BitmapError::DimensionsTooLarge { .. })
        ));
    }

    #[test]
    fn header_larger_than_data_is_rejected() {
        // 100 ops at most 62 pixels each cannot fill 1000x1000.
        let mut data = bare_header(1000, 1000, 3, 0);
        data.extend_from_slice(&[0xFD; 100]);
        data.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
        assert!(matches!(
            decode(&data, None, &Unstoppable),
            Err(BitmapError::UnexpectedEof)
        ));
    }

    #[test]
    fn linear_colorspace_survives_reencode() {
        for alpha in [false, true] {
            let grid = CarrierGrid::from_fn(4, 3, SampleDepth::Eight, alpha, |x, y| {
                RGBA16::new(x as u16, y as u16, 9, 255)
            })
            .with_encoding(ColorEncoding::Linear);
            let encoded = encode(&grid, &Unstoppable).unwrap();
            assert_eq!(encoded[13], 1, "colorspace byte");
            let decoded = decode(&encoded, None, &Unstoppable).unwrap();
            assert_eq!(decoded.encoding(), ColorEncoding::Linear);
            assert_eq!(encode(&decoded, &Unstoppable).unwrap()[13], 1);
        }
    }
}
