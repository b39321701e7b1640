//! # zenstego
//!
//! Hide a byte payload in the pixels of a lossless raster image, and get it
//! back out.
//!
//! ## How it works
//!
//! The payload is prefixed with its length as a 4-byte big-endian integer.
//! Each byte of that frame replaces the low byte of one color sample, visiting
//! pixels row by row, left to right, and red, green, blue within a pixel.
//! Alpha is never used and is forced fully opaque in the output. Samples past
//! the end of the frame keep the cover's original values.
//!
//! A `width` x `height` carrier therefore holds `3 * width * height - 4`
//! payload bytes; see [`capacity()`].
//!
//! ## Supported Containers
//!
//! - **PPM** (P6) and **PAM** (P7, RGB / RGB_ALPHA) at 8 or 16 bits
//! - **BMP**, uncompressed 24-bit and 32-bit
//! - **farbfeld**, 16-bit RGBA
//! - **PNG** at 8 or 16 bits (`png` feature, on by default); any PNG is
//!   accepted as a cover, output is RGB or RGBA
//! - **QOI** (`qoi` feature, on by default)
//!
//! Any other container can be plugged in through [`ContainerCodec`].
//!
//! ## Non-Goals
//!
//! - Lossy containers (JPEG and friends quantize samples and destroy the payload)
//! - Resistance to statistical steganalysis
//! - Encryption of the payload
//!
//! ## Usage
//!
//! ```no_run
//! use std::io::Read;
//! use zenstego::{ContainerFormat, StegoReader, StegoWriter};
//!
//! let cover: &[u8] = &[]; // your PNG/PPM/PAM/BMP/farbfeld/QOI bytes
//! let mut carrier = Vec::new();
//!
//! let mut writer = StegoWriter::<&mut Vec<u8>>::builder()
//!     .format(ContainerFormat::Pam)
//!     .open(cover, &mut carrier)?;
//! writer.write_payload(b"HELLO")?;
//! writer.finalize()?;
//!
//! let mut reader = StegoReader::new(carrier.as_slice())?;
//! let mut message = Vec::new();
//! reader.read_to_end(&mut message)?;
//! assert_eq!(message, b"HELLO");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod capacity;
pub mod codec;
pub mod cursor;
mod error;
pub mod frame;
mod grid;
mod limits;
mod reader;
mod writer;

mod bmp;
mod farbfeld;
#[cfg(feature = "png")]
mod png;
mod pnm;
#[cfg(feature = "qoi")]
mod qoi;

// Re-exports
pub use capacity::{capacity, total_samples};
pub use codec::{BitmapCodec, ContainerCodec, ContainerFormat};
pub use enough::{Stop, Unstoppable};
pub use rgb::RGBA16;
pub use error::{BitmapError, StegoError};
pub use grid::{CarrierGrid, ColorEncoding, SampleDepth};
pub use limits::Limits;
pub use reader::{Chunk, StegoReader};
pub use writer::{StegoWriter, WriterBuilder};
