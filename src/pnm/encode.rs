//! PNM encoder: P6 and P7 at 8 or 16 bits per sample.

use enough::Stop;

use super::PnmFormat;
use crate::error::BitmapError;
use crate::grid::{CarrierGrid, SampleDepth};

pub(crate) fn encode_pnm(
    grid: &CarrierGrid,
    format: PnmFormat,
    stop: &dyn Stop,
) -> Result<Vec<u8>, BitmapError> {
    let width = grid.width();
    let height = grid.height();
    let maxval = grid.depth().max_value();
    let channels = match format {
        PnmFormat::Pam if grid.has_alpha() => 4,
        _ => 3,
    };

    let header = match format {
        PnmFormat::Ppm => format!("P6\n{width} {height}\n{maxval}\n"),
        PnmFormat::Pam => {
            let tupltype = if channels == 4 { "RGB_ALPHA" } else { "RGB" };
            format!(
                "P7\nWIDTH {width}\nHEIGHT {height}\nDEPTH {channels}\nMAXVAL {maxval}\nTUPLTYPE {tupltype}\nENDHDR\n"
            )
        }
    };

    let bytes_per_sample = match grid.depth() {
        SampleDepth::Eight => 1,
        SampleDepth::Sixteen => 2,
    };
    let raster = width
        .checked_mul(height)
        .and_then(|wh| wh.checked_mul(channels * bytes_per_sample))
        .ok_or(BitmapError::DimensionsTooLarge {
            width: width as u32,
            height: height as u32,
        })?;
    let mut out = Vec::with_capacity(header.len() + raster);
    out.extend_from_slice(header.as_bytes());

    stop.check()?;

    for y in 0..height {
        if y % 16 == 0 {
            stop.check()?;
        }
        for x in 0..width {
            let px = grid.pixel(x, y);
            let samples = [px.r, px.g, px.b, px.a];
            for &sample in &samples[..channels] {
                match grid.depth() {
                    SampleDepth::Eight => out.push(sample as u8),
                    SampleDepth::Sixteen => out.extend_from_slice(&sample.to_be_bytes()),
                }
            }
        }
    }

    Ok(out)
}
