//! PNG carriers via the [png](https://crates.io/crates/png) crate.
//!
//! Any PNG decodes: palette and sub-byte images are expanded to 8 bits and
//! grayscale is replicated into R, G and B. Output is always truecolor RGB or
//! RGBA at the grid's depth, which PNG stores exactly for both 8 and 16 bits.

use std::io;

use ::png::{BitDepth, ColorType, Decoder, DecodingError, Encoder, Transformations};
use enough::Stop;
use rgb::RGBA16;

use crate::error::BitmapError;
use crate::grid::{CarrierGrid, SampleDepth};
use crate::limits::Limits;

/// PNG file signature.
pub(crate) const SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Worst-case DEFLATE expansion of the compressed input.
const MAX_INFLATE_RATIO: usize = 1032;

fn decoding_error(err: DecodingError) -> BitmapError {
    match err {
        DecodingError::IoError(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            BitmapError::UnexpectedEof
        }
        DecodingError::LimitsExceeded => {
            BitmapError::LimitExceeded("PNG decoder allocation".into())
        }
        other => BitmapError::InvalidData(format!("PNG: {other}")),
    }
}

fn color_channels(color: ColorType) -> usize {
    match color {
        ColorType::Grayscale | ColorType::Indexed => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
    }
}

pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<CarrierGrid, BitmapError> {
    let budget = limits
        .and_then(|l| l.max_memory_bytes)
        .map_or(usize::MAX, |b| usize::try_from(b).unwrap_or(usize::MAX));
    let mut decoder = Decoder::new_with_limits(data, ::png::Limits { bytes: budget });
    decoder.set_transformations(Transformations::EXPAND);
    let mut reader = decoder.read_info().map_err(decoding_error)?;

    let (width, height, stored_color, stored_depth) = {
        let info = reader.info();
        (info.width, info.height, info.color_type, info.bit_depth)
    };
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidHeader(format!(
            "zero dimension {width}x{height}"
        )));
    }
    if let Some(limits) = limits {
        limits.check(width, height)?;
    }

    // The compressed stream can only inflate so far; a header claiming more
    // stored bytes than that cannot be backed by the input.
    let too_large = || BitmapError::DimensionsTooLarge { width, height };
    let bits_per_pixel = color_channels(stored_color) * stored_depth as usize;
    let stored_row = (width as usize)
        .checked_mul(bits_per_pixel)
        .map(|bits| bits.div_ceil(8))
        .ok_or_else(too_large)?;
    let stored = stored_row
        .checked_mul(height as usize)
        .ok_or_else(too_large)?;
    if stored > data.len().saturating_mul(MAX_INFLATE_RATIO) {
        return Err(BitmapError::UnexpectedEof);
    }

    let (color, depth) = reader.output_color_type();
    let channels = color_channels(color);
    let bytes_per_sample = if depth == BitDepth::Sixteen { 2 } else { 1 };
    let w = width as usize;
    let h = height as usize;
    let row_bytes = w
        .checked_mul(channels * bytes_per_sample)
        .ok_or_else(too_large)?;
    let out_bytes = row_bytes.checked_mul(h).ok_or_else(too_large)?;

    stop.check()?;
    let mut buf = vec![0u8; out_bytes];
    reader.next_frame(&mut buf).map_err(decoding_error)?;

    let sample_depth = if depth == BitDepth::Sixteen {
        SampleDepth::Sixteen
    } else {
        SampleDepth::Eight
    };
    let opaque = sample_depth.max_value();
    let has_alpha = matches!(color, ColorType::Rgba | ColorType::GrayscaleAlpha);

    let mut out = Vec::with_capacity(w * h);
    for (row_idx, row) in buf.chunks_exact(row_bytes).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        let mut samples = row.chunks_exact(bytes_per_sample).map(|s| match s {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            [v] => u16::from(*v),
            _ => 0,
        });
        for _ in 0..w {
            let mut next = || samples.next().unwrap_or(0);
            let px = match channels {
                1 => {
                    let v = next();
                    RGBA16::new(v, v, v, opaque)
                }
                2 => {
                    let v = next();
                    RGBA16::new(v, v, v, next())
                }
                3 => RGBA16::new(next(), next(), next(), opaque),
                _ => RGBA16::new(next(), next(), next(), next()),
            };
            out.push(px);
        }
    }

    Ok(CarrierGrid::new(out, w, h, sample_depth, has_alpha))
}

pub(crate) fn encode(grid: &CarrierGrid, stop: &dyn Stop) -> Result<Vec<u8>, BitmapError> {
    let width = grid.width() as u32;
    let height = grid.height() as u32;
    let channels = if grid.has_alpha() { 4 } else { 3 };
    let (color, bytes_per_sample) = match (grid.has_alpha(), grid.depth()) {
        (true, SampleDepth::Eight) => (ColorType::Rgba, 1),
        (false, SampleDepth::Eight) => (ColorType::Rgb, 1),
        (true, SampleDepth::Sixteen) => (ColorType::Rgba, 2),
        (false, SampleDepth::Sixteen) => (ColorType::Rgb, 2),
    };
    let depth = if bytes_per_sample == 2 {
        BitDepth::Sixteen
    } else {
        BitDepth::Eight
    };
    let raw_len = grid
        .width()
        .checked_mul(grid.height())
        .and_then(|wh| wh.checked_mul(channels * bytes_per_sample))
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;

    let mut raw = Vec::with_capacity(raw_len);
    for y in 0..grid.height() {
        if y % 16 == 0 {
            stop.check()?;
        }
        for x in 0..grid.width() {
            let px = grid.pixel(x, y);
            let samples = [px.r, px.g, px.b, px.a];
            for &sample in &samples[..channels] {
                match grid.depth() {
                    SampleDepth::Eight => raw.push(sample as u8),
                    SampleDepth::Sixteen => raw.extend_from_slice(&sample.to_be_bytes()),
                }
            }
        }
    }

    let encoding_error = |e: ::png::EncodingError| BitmapError::InvalidData(format!("PNG: {e}"));
    let mut out = Vec::new();
    let mut encoder = Encoder::new(&mut out, width, height);
    encoder.set_color(color);
    encoder.set_depth(depth);
    let mut writer = encoder.write_header().map_err(encoding_error)?;
    writer.write_image_data(&raw).map_err(encoding_error)?;
    writer.finish().map_err(encoding_error)?;
    Ok(out)
}
