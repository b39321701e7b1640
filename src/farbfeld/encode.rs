//! Farbfeld encoder.
//!
//! Forked from zune-farbfeld 0.5.2 by Caleb Etemesi (MIT/Apache-2.0/Zlib).

use enough::Stop;

use crate::error::BitmapError;
use crate::grid::{CarrierGrid, SampleDepth};

/// Encode a grid to farbfeld.
///
/// 16-bit samples are written as-is. 8-bit samples expand via `val * 257`,
/// which repeats the byte and so leaves the low byte unchanged.
pub(crate) fn encode_farbfeld(grid: &CarrierGrid, stop: &dyn Stop) -> Result<Vec<u8>, BitmapError> {
    let width = grid.width() as u32;
    let height = grid.height() as u32;

    // Output: 16 header + w*h*8 pixel bytes
    let total = grid
        .width()
        .checked_mul(grid.height())
        .and_then(|wh| wh.checked_mul(8))
        .and_then(|bytes| bytes.checked_add(16))
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;

    let mut out = Vec::with_capacity(total);

    // Header
    out.extend_from_slice(b"farbfeld");
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());

    stop.check()?;

    let widen = |sample: u16| match grid.depth() {
        SampleDepth::Eight => (sample & 0xFF) * 257,
        SampleDepth::Sixteen => sample,
    };
    for y in 0..grid.height() {
        if y % 16 == 0 {
            stop.check()?;
        }
        for x in 0..grid.width() {
            let px = grid.pixel(x, y);
            for sample in [px.r, px.g, px.b, px.a] {
                out.extend_from_slice(&widen(sample).to_be_bytes());
            }
        }
    }

    Ok(out)
}
