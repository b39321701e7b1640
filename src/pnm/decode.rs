//! PNM header parsing and sample decoding.

use enough::Stop;
use rgb::RGBA16;

use super::PnmHeader;
use crate::error::BitmapError;
use crate::grid::{CarrierGrid, SampleDepth};

struct Tokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Skip whitespace and `#` comments.
    fn skip_blank(&mut self) {
        while let Some(&b) = self.data.get(self.pos) {
            if b == b'#' {
                while let Some(&c) = self.data.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn word(&mut self) -> Result<&'a [u8], BitmapError> {
        self.skip_blank();
        let start = self.pos;
        while let Some(&b) = self.data.get(self.pos) {
            if b.is_ascii_whitespace() || b == b'#' {
                break;
            }
            self.pos += 1;
        }
        if start == self.pos {
            return Err(BitmapError::UnexpectedEof);
        }
        Ok(&self.data[start..self.pos])
    }

    fn number(&mut self) -> Result<u32, BitmapError> {
        let word = self.word()?;
        core::str::from_utf8(word)
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(|| {
                BitmapError::InvalidHeader(format!(
                    "expected a number, got {:?}",
                    String::from_utf8_lossy(word)
                ))
            })
    }

    /// Consume the single whitespace byte that separates header and raster.
    fn end_of_header(&mut self) -> Result<usize, BitmapError> {
        match self.data.get(self.pos) {
            Some(b) if b.is_ascii_whitespace() => Ok(self.pos + 1),
            Some(_) => Err(BitmapError::InvalidHeader(
                "missing whitespace after header".into(),
            )),
            None => Err(BitmapError::UnexpectedEof),
        }
    }
}

pub(crate) fn parse_header(data: &[u8]) -> Result<PnmHeader, BitmapError> {
    match data.get(..2) {
        Some(b"P6") => parse_ppm(data),
        Some(b"P7") => parse_pam(data),
        Some(_) => Err(BitmapError::UnrecognizedFormat),
        None => Err(BitmapError::UnexpectedEof),
    }
}

fn parse_ppm(data: &[u8]) -> Result<PnmHeader, BitmapError> {
    let mut tokens = Tokens::new(data, 2);
    let width = tokens.number()?;
    let height = tokens.number()?;
    let maxval = tokens.number()?;
    let data_offset = tokens.end_of_header()?;
    finish_header(width, height, maxval, 3, data_offset)
}

fn parse_pam(data: &[u8]) -> Result<PnmHeader, BitmapError> {
    let mut tokens = Tokens::new(data, 2);
    let mut width = None;
    let mut height = None;
    let mut depth = None;
    let mut maxval = None;
    let mut tupltype: Option<&[u8]> = None;

    loop {
        match tokens.word()? {
            b"ENDHDR" => break,
            b"WIDTH" => width = Some(tokens.number()?),
            b"HEIGHT" => height = Some(tokens.number()?),
            b"DEPTH" => depth = Some(tokens.number()?),
            b"MAXVAL" => maxval = Some(tokens.number()?),
            b"TUPLTYPE" => tupltype = Some(tokens.word()?),
            other => {
                return Err(BitmapError::InvalidHeader(format!(
                    "unknown PAM header field {:?}",
                    String::from_utf8_lossy(other)
                )));
            }
        }
    }
    let data_offset = tokens.end_of_header()?;

    let missing = |field: &str| BitmapError::InvalidHeader(format!("PAM header lacks {field}"));
    let width = width.ok_or_else(|| missing("WIDTH"))?;
    let height = height.ok_or_else(|| missing("HEIGHT"))?;
    let depth = depth.ok_or_else(|| missing("DEPTH"))?;
    let maxval = maxval.ok_or_else(|| missing("MAXVAL"))?;

    let channels = match (depth, tupltype) {
        (3, None | Some(b"RGB")) => 3,
        (4, None | Some(b"RGB_ALPHA")) => 4,
        _ => {
            return Err(BitmapError::UnsupportedVariant(format!(
                "PAM depth {depth} tuple type {:?} is not a color carrier",
                tupltype.map(String::from_utf8_lossy)
            )));
        }
    };
    finish_header(width, height, maxval, channels, data_offset)
}

fn finish_header(
    width: u32,
    height: u32,
    maxval: u32,
    channels: usize,
    data_offset: usize,
) -> Result<PnmHeader, BitmapError> {
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidHeader(format!(
            "zero dimension {width}x{height}"
        )));
    }
    let depth = match maxval {
        255 => SampleDepth::Eight,
        65535 => SampleDepth::Sixteen,
        other => {
            return Err(BitmapError::UnsupportedVariant(format!(
                "maxval {other} (only 255 and 65535 keep samples exact)"
            )));
        }
    };
    Ok(PnmHeader {
        width,
        height,
        depth,
        channels,
        data_offset,
    })
}

/// Convert raw samples (8-bit, or 16-bit big-endian) into a grid.
pub(crate) fn decode_samples(
    pixel_data: &[u8],
    header: &PnmHeader,
    stop: &dyn Stop,
) -> Result<CarrierGrid, BitmapError> {
    let dims_err = BitmapError::DimensionsTooLarge {
        width: header.width,
        height: header.height,
    };
    let w = header.width as usize;
    let h = header.height as usize;
    let bytes_per_sample = if header.depth == SampleDepth::Sixteen { 2 } else { 1 };
    let row_bytes = w
        .checked_mul(header.channels * bytes_per_sample)
        .ok_or(dims_err)?;
    let expected = row_bytes.checked_mul(h).ok_or(BitmapError::DimensionsTooLarge {
        width: header.width,
        height: header.height,
    })?;
    let raster = pixel_data
        .get(..expected)
        .ok_or(BitmapError::UnexpectedEof)?;

    let opaque = header.depth.max_value();
    let mut out = Vec::with_capacity(w * h);
    for (row_idx, row) in raster.chunks_exact(row_bytes).enumerate() {
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
            let r = next();
            let g = next();
            let b = next();
            let a = if header.channels == 4 { next() } else { opaque };
            out.push(RGBA16::new(r, g, b, a));
        }
    }

    Ok(CarrierGrid::new(
        out,
        w,
        h,
        header.depth,
        header.channels == 4,
    ))
}
