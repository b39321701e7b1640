//! Container codec capability.
//!
//! The embedding core only needs two things from a raster container: turn
//! file bytes into a [`CarrierGrid`] and turn a grid back into file bytes.
//! [`ContainerCodec`] is that seam; [`BitmapCodec`] is the built-in
//! implementation over PNM, BMP, farbfeld and, behind their features, PNG
//! and QOI.

use core::fmt;
use core::str::FromStr;

use enough::{Stop, Unstoppable};

use crate::error::{BitmapError, StegoError};
use crate::grid::{CarrierGrid, SampleDepth};
use crate::limits::Limits;

/// Raster container decode/encode, as seen by the embedding core.
pub trait ContainerCodec {
    /// Output container selector.
    type Format: Copy + fmt::Debug;
    /// Container failures, surfaced unchanged through [`StegoError::Container`].
    type Error: std::error::Error + Send + Sync + 'static;

    /// Decode container bytes into a grid, reporting which format they were.
    fn decode(&self, data: &[u8]) -> Result<(CarrierGrid, Self::Format), Self::Error>;

    /// Encode a grid into container bytes of the given format.
    fn encode(&self, grid: &CarrierGrid, format: Self::Format) -> Result<Vec<u8>, Self::Error>;

    /// Whether `format` reproduces every sample of a grid with `depth`
    /// exactly. Formats that do not are refused as output targets.
    fn preserves_samples(&self, format: Self::Format, depth: SampleDepth) -> bool;
}

/// Container formats handled by [`BitmapCodec`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    /// P6 binary PPM, maxval 255 or 65535.
    Ppm,
    /// P7 PAM with RGB or RGB_ALPHA tuples, maxval 255 or 65535.
    Pam,
    /// Uncompressed 24-bit or 32-bit BMP.
    Bmp,
    /// Farbfeld, 16-bit RGBA.
    Farbfeld,
    /// PNG, written as 8-bit or 16-bit RGB or RGBA.
    #[cfg(feature = "png")]
    Png,
    /// QOI, 8-bit RGB or RGBA.
    #[cfg(feature = "qoi")]
    Qoi,
}

impl ContainerFormat {
    /// Short lowercase name, also accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Ppm => "ppm",
            Self::Pam => "pam",
            Self::Bmp => "bmp",
            Self::Farbfeld => "farbfeld",
            #[cfg(feature = "png")]
            Self::Png => "png",
            #[cfg(feature = "qoi")]
            Self::Qoi => "qoi",
        }
    }

    /// Whether this format stores samples of `depth` without loss.
    pub fn preserves(self, depth: SampleDepth) -> bool {
        match self {
            Self::Ppm | Self::Pam | Self::Farbfeld => true,
            Self::Bmp => depth == SampleDepth::Eight,
            #[cfg(feature = "png")]
            Self::Png => true,
            #[cfg(feature = "qoi")]
            Self::Qoi => depth == SampleDepth::Eight,
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContainerFormat {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ppm" => Ok(Self::Ppm),
            "pam" => Ok(Self::Pam),
            "bmp" => Ok(Self::Bmp),
            "farbfeld" | "ff" => Ok(Self::Farbfeld),
            #[cfg(feature = "png")]
            "png" => Ok(Self::Png),
            #[cfg(feature = "qoi")]
            "qoi" => Ok(Self::Qoi),
            "jpeg" | "jpg" => Err(StegoError::UnsupportedFormat(
                "jpeg is lossy and cannot carry payload bytes".into(),
            )),
            other => Err(StegoError::UnsupportedFormat(other.into())),
        }
    }
}

/// Identify a container from its magic bytes.
pub fn detect(data: &[u8]) -> Option<ContainerFormat> {
    match data {
        [b'P', b'6', ..] => Some(ContainerFormat::Ppm),
        [b'P', b'7', ..] => Some(ContainerFormat::Pam),
        [b'B', b'M', ..] => Some(ContainerFormat::Bmp),
        _ if data.starts_with(b"farbfeld") => Some(ContainerFormat::Farbfeld),
        #[cfg(feature = "png")]
        _ if data.starts_with(crate::png::SIGNATURE) => Some(ContainerFormat::Png),
        #[cfg(feature = "qoi")]
        _ if data.starts_with(b"qoif") => Some(ContainerFormat::Qoi),
        _ => None,
    }
}

/// Decode any supported container (auto-detected) into a carrier grid.
pub fn decode(
    data: &[u8],
    stop: impl Stop,
) -> Result<(CarrierGrid, ContainerFormat), BitmapError> {
    decode_with_limits(data, None, &stop)
}

/// Decode with resource limits checked before the grid is allocated.
pub fn decode_with_limits(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<(CarrierGrid, ContainerFormat), BitmapError> {
    let format = detect(data).ok_or(BitmapError::UnrecognizedFormat)?;
    let grid = match format {
        ContainerFormat::Ppm | ContainerFormat::Pam => crate::pnm::decode(data, limits, stop)?,
        ContainerFormat::Bmp => crate::bmp::decode(data, limits, stop)?,
        ContainerFormat::Farbfeld => crate::farbfeld::decode(data, limits, stop)?,
        #[cfg(feature = "png")]
        ContainerFormat::Png => crate::png::decode(data, limits, stop)?,
        #[cfg(feature = "qoi")]
        ContainerFormat::Qoi => crate::qoi::decode(data, limits, stop)?,
    };
    Ok((grid, format))
}

/// Encode a carrier grid as `format`.
pub fn encode(
    grid: &CarrierGrid,
    format: ContainerFormat,
    stop: impl Stop,
) -> Result<Vec<u8>, BitmapError> {
    let stop: &dyn Stop = &stop;
    match format {
        ContainerFormat::Ppm => crate::pnm::encode(grid, crate::pnm::PnmFormat::Ppm, stop),
        ContainerFormat::Pam => crate::pnm::encode(grid, crate::pnm::PnmFormat::Pam, stop),
        ContainerFormat::Bmp => crate::bmp::encode(grid, stop),
        ContainerFormat::Farbfeld => crate::farbfeld::encode(grid, stop),
        #[cfg(feature = "png")]
        ContainerFormat::Png => crate::png::encode(grid, stop),
        #[cfg(feature = "qoi")]
        ContainerFormat::Qoi => crate::qoi::encode(grid, stop),
    }
}

/// The built-in [`ContainerCodec`] over the lossless bitmap formats.
#[derive(Clone, Debug, Default)]
pub struct BitmapCodec {
    limits: Limits,
}

impl BitmapCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply resource limits to every decode.
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }
}

impl ContainerCodec for BitmapCodec {
    type Format = ContainerFormat;
    type Error = BitmapError;

    fn decode(&self, data: &[u8]) -> Result<(CarrierGrid, ContainerFormat), BitmapError> {
        decode_with_limits(data, Some(&self.limits), &Unstoppable)
    }

    fn encode(&self, grid: &CarrierGrid, format: ContainerFormat) -> Result<Vec<u8>, BitmapError> {
        encode(grid, format, Unstoppable)
    }

    fn preserves_samples(&self, format: ContainerFormat, depth: SampleDepth) -> bool {
        format.preserves(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_magic() {
        assert_eq!(detect(b"P6\n1 1\n255\n"), Some(ContainerFormat::Ppm));
        assert_eq!(detect(b"P7\nWIDTH 1\n"), Some(ContainerFormat::Pam));
        assert_eq!(detect(b"BM...."), Some(ContainerFormat::Bmp));
        assert_eq!(detect(b"farbfeld\0\0\0\x01"), Some(ContainerFormat::Farbfeld));
        assert_eq!(detect(b"GIF89a"), None);
        assert_eq!(detect(b""), None);
    }

    #[cfg(feature = "png")]
    #[test]
    fn png_is_detected_and_lossless_at_both_depths() {
        assert_eq!(detect(b"\x89PNG\r\n\x1a\n\0\0\0\x0dIHDR"), Some(ContainerFormat::Png));
        assert_eq!("png".parse::<ContainerFormat>().unwrap(), ContainerFormat::Png);
        let codec = BitmapCodec::new();
        assert!(codec.preserves_samples(ContainerFormat::Png, SampleDepth::Eight));
        assert!(codec.preserves_samples(ContainerFormat::Png, SampleDepth::Sixteen));
    }

    #[test]
    fn parses_names() {
        assert_eq!("PPM".parse::<ContainerFormat>().unwrap(), ContainerFormat::Ppm);
        assert_eq!("ff".parse::<ContainerFormat>().unwrap(), ContainerFormat::Farbfeld);
        for name in ["jpeg", "gif", "webp", ""] {
            assert!(matches!(
                name.parse::<ContainerFormat>(),
                Err(StegoError::UnsupportedFormat(_))
            ));
        }
    }

    #[test]
    fn eight_bit_only_formats_refuse_sixteen_bit() {
        let codec = BitmapCodec::new();
        assert!(codec.preserves_samples(ContainerFormat::Bmp, SampleDepth::Eight));
        assert!(!codec.preserves_samples(ContainerFormat::Bmp, SampleDepth::Sixteen));
        assert!(codec.preserves_samples(ContainerFormat::Farbfeld, SampleDepth::Eight));
        assert!(codec.preserves_samples(ContainerFormat::Pam, SampleDepth::Sixteen));
    }

    #[test]
    fn unknown_magic_is_a_container_error() {
        assert!(matches!(
            decode(b"GIF89a", Unstoppable),
            Err(BitmapError::UnrecognizedFormat)
        ));
    }
}
