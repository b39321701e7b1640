//! Payload reader: recovers the frame from a carrier and serves it as a
//! byte stream.

use std::io::{self, Read};

use tracing::{debug, trace};

use crate::capacity::capacity;
use crate::codec::{BitmapCodec, ContainerCodec};
use crate::cursor::{ChannelCursor, peek_low_byte};
use crate::error::StegoError;
use crate::frame::{self, HEADER_SIZE};
use crate::grid::CarrierGrid;

/// Outcome of one [`StegoReader::read_chunk`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Bytes copied into the caller's buffer.
    pub len: usize,
    /// The read position has reached the end of the payload.
    pub end_of_stream: bool,
}

/// Reads a payload hidden by [`StegoWriter`](crate::StegoWriter).
///
/// The whole payload is recovered when the reader is constructed, so a
/// malformed carrier fails right there rather than partway through reading.
///
/// ```no_run
/// use std::fs::File;
/// use std::io::Read;
/// use zenstego::StegoReader;
///
/// let mut reader = StegoReader::new(File::open("carrier.ppm")?)?;
/// let mut message = Vec::with_capacity(reader.len());
/// reader.read_to_end(&mut message)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct StegoReader {
    payload: Vec<u8>,
    pos: usize,
}

impl StegoReader {
    /// Decode a carrier with the built-in codec.
    pub fn new<R: Read>(source: R) -> Result<Self, StegoError> {
        Self::with_codec(&BitmapCodec::new(), source)
    }

    /// Decode a carrier with a specific container codec.
    pub fn with_codec<C: ContainerCodec, R: Read>(
        codec: &C,
        mut source: R,
    ) -> Result<Self, StegoError> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;
        let (grid, _) = codec.decode(&data).map_err(StegoError::container)?;
        Self::from_grid(&grid)
    }

    /// Recover the payload from an already decoded grid.
    pub fn from_grid(grid: &CarrierGrid) -> Result<Self, StegoError> {
        let available = capacity(grid.width() as u32, grid.height() as u32)?;
        let mut cursor = ChannelCursor::for_grid(grid);

        let mut header = [0u8; HEADER_SIZE];
        for (dst, slot) in header.iter_mut().zip(cursor.by_ref()) {
            *dst = peek_low_byte(grid, slot);
        }
        let claimed = frame::decode_header(header);
        debug!(
            claimed,
            available,
            width = grid.width(),
            height = grid.height(),
            "read frame header"
        );
        if u64::from(claimed) > available as u64 {
            return Err(StegoError::TruncatedCarrier {
                claimed: u64::from(claimed),
                available,
            });
        }

        let payload = cursor
            .take(claimed as usize)
            .map(|slot| peek_low_byte(grid, slot))
            .collect();
        Ok(Self { payload, pos: 0 })
    }

    /// Copy the next bytes into `buf` and advance.
    ///
    /// `end_of_stream` is set by the call that reaches the end of the
    /// payload, together with the bytes it returned, and by every call
    /// after that.
    pub fn read_chunk(&mut self, buf: &mut [u8]) -> Chunk {
        let rest = &self.payload[self.pos..];
        let len = buf.len().min(rest.len());
        buf[..len].copy_from_slice(&rest[..len]);
        self.pos += len;
        trace!(len, pos = self.pos, total = self.payload.len(), "read payload chunk");
        Chunk {
            len,
            end_of_stream: self.pos == self.payload.len(),
        }
    }

    /// Total payload length from the frame header.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Bytes already read.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.payload.len() - self.pos
    }

    /// The unread rest of the payload.
    pub fn into_payload(mut self) -> Vec<u8> {
        self.payload.drain(..self.pos);
        self.payload
    }
}

impl Read for StegoReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_chunk(buf).len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::set_low_byte;
    use crate::grid::SampleDepth;
    use rgb::RGBA16;

    fn stamped(width: usize, height: usize, frame: &[u8]) -> CarrierGrid {
        let mut grid = CarrierGrid::from_fn(width, height, SampleDepth::Eight, false, |x, y| {
            RGBA16::new((x * 7) as u16, (y * 11) as u16, 99, 255)
        });
        let cursor = ChannelCursor::for_grid(&grid);
        for (slot, &byte) in cursor.zip(frame) {
            set_low_byte(&mut grid, slot, byte);
        }
        grid
    }

    #[test]
    fn reads_hello() {
        let grid = stamped(10, 10, b"\0\0\0\x05HELLO");
        let mut reader = StegoReader::from_grid(&grid).unwrap();
        assert_eq!(reader.len(), 5);

        let mut buf = [0u8; 10];
        let chunk = reader.read_chunk(&mut buf);
        assert_eq!(
            chunk,
            Chunk {
                len: 5,
                end_of_stream: true
            }
        );
        assert_eq!(&buf[..5], b"HELLO");
    }

    #[test]
    fn partial_reads_do_not_overlap() {
        let grid = stamped(4, 4, b"\0\0\0\x07abcdefg");
        let mut reader = StegoReader::from_grid(&grid).unwrap();
        let mut buf = [0u8; 3];

        assert_eq!(reader.read_chunk(&mut buf).len, 3);
        assert_eq!(&buf, b"abc");
        let chunk = reader.read_chunk(&mut buf);
        assert_eq!((chunk.len, chunk.end_of_stream), (3, false));
        assert_eq!(&buf, b"def");
        let chunk = reader.read_chunk(&mut buf);
        assert_eq!((chunk.len, chunk.end_of_stream), (1, true));
        assert_eq!(buf[0], b'g');
        let chunk = reader.read_chunk(&mut buf);
        assert_eq!((chunk.len, chunk.end_of_stream), (0, true));
        assert_eq!(reader.position(), 7);
    }

    #[test]
    fn empty_payload_ends_immediately() {
        let grid = stamped(2, 2, &[0, 0, 0, 0]);
        let mut reader = StegoReader::from_grid(&grid).unwrap();
        assert!(reader.is_empty());
        let chunk = reader.read_chunk(&mut [0u8; 4]);
        assert_eq!(
            chunk,
            Chunk {
                len: 0,
                end_of_stream: true
            }
        );
    }

    #[test]
    fn header_longer_than_carrier() {
        // 2x2 grid holds 12 samples: 4 header + 8 payload.
        let grid = stamped(2, 2, &[0, 0, 0, 9]);
        assert!(matches!(
            StegoReader::from_grid(&grid),
            Err(StegoError::TruncatedCarrier {
                claimed: 9,
                available: 8
            })
        ));

        let grid = stamped(2, 2, &[0, 0, 0, 8]);
        assert_eq!(StegoReader::from_grid(&grid).unwrap().len(), 8);
    }

    #[test]
    fn tiny_grid_is_too_small() {
        let grid = stamped(1, 1, &[]);
        assert!(matches!(
            StegoReader::from_grid(&grid),
            Err(StegoError::CarrierTooSmall { .. })
        ));
    }

    #[test]
    fn into_payload_skips_read_bytes() {
        let grid = stamped(4, 4, b"\0\0\0\x04wxyz");
        let mut reader = StegoReader::from_grid(&grid).unwrap();
        reader.read_chunk(&mut [0u8; 1]);
        assert_eq!(reader.into_payload(), b"xyz");
    }
}
