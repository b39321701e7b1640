use crate::error::BitmapError;

/// Resource limits applied while decoding a carrier container.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum memory bytes for the decoded carrier grid.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check dimensions against limits. Returns Ok(()) or LimitExceeded error.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), BitmapError> {
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(BitmapError::LimitExceeded(format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(BitmapError::LimitExceeded(format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max_px) = self.max_pixels {
            if pixels > max_px {
                return Err(BitmapError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        // Every grid is held as RGBA16 regardless of the container's depth.
        if let Some(max_mem) = self.max_memory_bytes {
            let bytes = pixels.saturating_mul(8);
            if bytes > max_mem {
                return Err(BitmapError::LimitExceeded(format!(
                    "allocation {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unlimited() {
        assert!(Limits::default().check(u32::MAX, u32::MAX).is_ok());
    }

    #[test]
    fn memory_limit_counts_rgba16() {
        let limits = Limits {
            max_memory_bytes: Some(8 * 100),
            ..Default::default()
        };
        assert!(limits.check(10, 10).is_ok());
        assert!(matches!(
            limits.check(10, 11),
            Err(BitmapError::LimitExceeded(_))
        ));
    }
}
