use imgref::ImgVec;
use rgb::RGBA16;

/// Bit depth of the samples a carrier grid was decoded from.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleDepth {
    /// Samples are 0..=255; the low byte is the whole sample.
    Eight,
    /// Samples are 0..=65535; only the low byte carries payload.
    Sixteen,
}

impl SampleDepth {
    /// Largest sample value at this depth (fully opaque alpha).
    pub fn max_value(self) -> u16 {
        match self {
            Self::Eight => 0xFF,
            Self::Sixteen => 0xFFFF,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }
}

/// Transfer function a container tagged its samples with.
///
/// Only carried through so the output container repeats the cover's tag;
/// samples are never converted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorEncoding {
    #[default]
    Srgb,
    Linear,
}

/// A 2-D grid of RGB(A) samples decoded from a carrier container.
///
/// Samples of every depth are stored widened to `u16`, so 8-bit grids hold
/// values in `0..=255`. The alpha channel is never used for payload.
#[derive(Clone, Debug)]
pub struct CarrierGrid {
    pixels: ImgVec<RGBA16>,
    depth: SampleDepth,
    has_alpha: bool,
    encoding: ColorEncoding,
}

impl CarrierGrid {
    /// Wrap decoded pixels. `pixels` must be `width * height` long.
    pub fn new(
        pixels: Vec<RGBA16>,
        width: usize,
        height: usize,
        depth: SampleDepth,
        has_alpha: bool,
    ) -> Self {
        Self {
            pixels: ImgVec::new(pixels, width, height),
            depth,
            has_alpha,
            encoding: ColorEncoding::Srgb,
        }
    }

    /// Tag the grid with the transfer function of its source container.
    pub fn with_encoding(mut self, encoding: ColorEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Build a grid by evaluating `f(x, y)` for every pixel, row by row.
    pub fn from_fn(
        width: usize,
        height: usize,
        depth: SampleDepth,
        has_alpha: bool,
        mut f: impl FnMut(usize, usize) -> RGBA16,
    ) -> Self {
        let mut buf = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                buf.push(f(x, y));
            }
        }
        Self::new(buf, width, height, depth, has_alpha)
    }

    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    pub fn depth(&self) -> SampleDepth {
        self.depth
    }

    pub fn encoding(&self) -> ColorEncoding {
        self.encoding
    }

    /// Whether the source container carried an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> RGBA16 {
        self.pixels.buf()[y * self.pixels.stride() + x]
    }

    pub(crate) fn pixel_mut(&mut self, x: usize, y: usize) -> &mut RGBA16 {
        let stride = self.pixels.stride();
        &mut self.pixels.buf_mut()[y * stride + x]
    }

    /// Row-major iterator over all pixels.
    pub fn pixels(&self) -> impl Iterator<Item = RGBA16> + '_ {
        let width = self.width();
        self.pixels
            .buf()
            .chunks(self.pixels.stride().max(1))
            .take(self.height())
            .flat_map(move |row| row[..width].iter().copied())
    }

    /// The underlying image buffer.
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, RGBA16> {
        self.pixels.as_ref()
    }

    /// A fresh grid with the same colors and every alpha sample forced to
    /// fully opaque.
    pub fn to_opaque(&self) -> CarrierGrid {
        let max = self.depth.max_value();
        let buf = self
            .pixels()
            .map(|px| RGBA16::new(px.r, px.g, px.b, max))
            .collect();
        CarrierGrid::new(buf, self.width(), self.height(), self.depth, self.has_alpha)
            .with_encoding(self.encoding)
    }
}

impl PartialEq for CarrierGrid {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.depth == other.depth
            && self.has_alpha == other.has_alpha
            && self.encoding == other.encoding
            && self.pixels().eq(other.pixels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_opaque_keeps_colors() {
        let grid = CarrierGrid::from_fn(3, 2, SampleDepth::Eight, true, |x, y| {
            RGBA16::new(x as u16, y as u16, 7, 12)
        });
        let opaque = grid.to_opaque();
        assert_eq!(opaque.width(), 3);
        assert_eq!(opaque.height(), 2);
        for (a, b) in grid.pixels().zip(opaque.pixels()) {
            assert_eq!((a.r, a.g, a.b), (b.r, b.g, b.b));
            assert_eq!(b.a, 255);
        }
    }

    #[test]
    fn to_opaque_keeps_encoding() {
        let grid = CarrierGrid::from_fn(2, 2, SampleDepth::Eight, false, |_, _| {
            RGBA16::new(1, 2, 3, 255)
        })
        .with_encoding(ColorEncoding::Linear);
        assert_eq!(grid.to_opaque().encoding(), ColorEncoding::Linear);
        assert_ne!(grid, grid.clone().with_encoding(ColorEncoding::Srgb));
    }

    #[test]
    fn sixteen_bit_alpha_is_full_range() {
        let grid = CarrierGrid::from_fn(1, 1, SampleDepth::Sixteen, false, |_, _| {
            RGBA16::new(0x1234, 0x5678, 0x9abc, 0)
        });
        assert_eq!(grid.to_opaque().pixel(0, 0).a, 0xFFFF);
    }
}
