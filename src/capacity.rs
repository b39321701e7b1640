//! Payload capacity of a carrier grid.
//!
//! Every pixel of the grid is usable and carries one byte in each of its
//! three color channels. The frame header is taken out of that total.

use crate::error::StegoError;
use crate::frame::HEADER_SIZE;

/// Channel samples (and thus framed bytes) a `width` x `height` grid holds.
pub fn total_samples(width: u32, height: u32) -> u64 {
    u64::from(width)
        .saturating_mul(u64::from(height))
        .saturating_mul(3)
}

/// Maximum payload length for a `width` x `height` carrier.
///
/// Fails with [`StegoError::CarrierTooSmall`] when the grid cannot even hold
/// the length header. The result is clamped to what the 32-bit length
/// header can describe.
pub fn capacity(width: u32, height: u32) -> Result<usize, StegoError> {
    let payload = total_samples(width, height)
        .checked_sub(HEADER_SIZE as u64)
        .ok_or(StegoError::CarrierTooSmall { width, height })?;
    let payload = payload.min(u64::from(u32::MAX));
    usize::try_from(payload).map_err(|_| StegoError::CarrierTooSmall { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_by_ten() {
        assert_eq!(capacity(10, 10).unwrap(), 296);
    }

    #[test]
    fn too_small_for_header() {
        assert!(matches!(
            capacity(1, 1),
            Err(StegoError::CarrierTooSmall {
                width: 1,
                height: 1
            })
        ));
        assert!(capacity(0, 100).is_err());
        assert!(capacity(100, 0).is_err());
    }

    #[test]
    fn smallest_carriers() {
        // 2 pixels = 6 samples, 4 go to the header.
        assert_eq!(capacity(2, 1).unwrap(), 2);
        assert_eq!(capacity(1, 2).unwrap(), 2);
    }

    #[test]
    fn monotonic_in_both_dimensions() {
        for w in 1..24u32 {
            for h in 1..24u32 {
                let here = capacity(w, h).unwrap_or(0);
                assert!(capacity(w + 1, h).unwrap_or(0) >= here);
                assert!(capacity(w, h + 1).unwrap_or(0) >= here);
            }
        }
    }

    #[test]
    fn clamped_to_header_range() {
        assert_eq!(capacity(u32::MAX, u32::MAX).unwrap(), u32::MAX as usize);
    }
}
