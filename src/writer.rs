//! Payload writer: buffers bytes, then stamps the frame into a carrier.

use std::io::{self, Read, Write};

use tracing::debug;

use crate::capacity::capacity;
use crate::codec::{BitmapCodec, ContainerCodec};
use crate::cursor::{ChannelCursor, set_low_byte};
use crate::error::StegoError;
use crate::frame::{self, HEADER_SIZE};
use crate::grid::CarrierGrid;
use crate::limits::Limits;

enum State {
    /// Accepting payload bytes.
    Open {
        cover: CarrierGrid,
        payload: Vec<u8>,
    },
    /// Finalized, successfully or not. Terminal.
    Closed,
}

/// Hides a payload in a copy of a cover image.
///
/// Bytes written are buffered up to [`capacity`](Self::capacity). Nothing
/// reaches the sink until [`finalize`](Self::finalize), which stamps the
/// length-prefixed payload into the low byte of each color sample and
/// encodes the result with the configured container format.
///
/// ```no_run
/// use std::fs::File;
/// use zenstego::StegoWriter;
///
/// let mut writer = StegoWriter::new(File::open("cover.ppm")?, File::create("carrier.ppm")?)?;
/// writer.write_payload(b"a very secret message")?;
/// writer.finalize()?;
/// # Ok::<(), zenstego::StegoError>(())
/// ```
pub struct StegoWriter<W: Write, C: ContainerCodec = BitmapCodec> {
    codec: C,
    format: C::Format,
    capacity: usize,
    sink: W,
    state: State,
}

impl<W: Write> StegoWriter<W> {
    /// Open a writer over `cover` with the built-in codec, producing the
    /// cover's own container format.
    pub fn new<R: Read>(cover: R, sink: W) -> Result<Self, StegoError> {
        WriterBuilder::new().open(cover, sink)
    }

    pub fn builder() -> WriterBuilder<BitmapCodec> {
        WriterBuilder::new()
    }
}

impl<W: Write, C: ContainerCodec> StegoWriter<W, C> {
    /// Append as much of `data` as still fits.
    ///
    /// Returns the number of bytes accepted. When capacity cuts the call
    /// short, the count is reported in [`StegoError::ImageFull`] instead;
    /// those bytes were accepted all the same. After
    /// [`finalize`](Self::finalize) every call fails with
    /// [`StegoError::ImageClosed`].
    pub fn write_payload(&mut self, data: &[u8]) -> Result<usize, StegoError> {
        let State::Open { payload, .. } = &mut self.state else {
            return Err(StegoError::ImageClosed);
        };
        let room = self.capacity - payload.len();
        let written = data.len().min(room);
        payload.extend_from_slice(&data[..written]);
        if written < data.len() {
            return Err(StegoError::ImageFull { written });
        }
        Ok(written)
    }

    /// Stamp the buffered payload into the carrier and write the container
    /// to the sink.
    ///
    /// The writer is closed afterwards whether or not this succeeds. The
    /// sink receives nothing unless the whole carrier was encoded.
    pub fn finalize(&mut self) -> Result<(), StegoError> {
        let State::Open { cover, payload } = std::mem::replace(&mut self.state, State::Closed)
        else {
            return Err(StegoError::ImageClosed);
        };

        let mut carrier = cover.to_opaque();
        drop(cover);

        let cursor = ChannelCursor::for_grid(&carrier);
        debug_assert!(cursor.len() >= HEADER_SIZE + payload.len());
        for (slot, byte) in cursor.zip(frame::frame_bytes(&payload)) {
            set_low_byte(&mut carrier, slot, byte);
        }

        let encoded = self
            .codec
            .encode(&carrier, self.format)
            .map_err(StegoError::container)?;
        debug!(
            payload_len = payload.len(),
            container_len = encoded.len(),
            format = ?self.format,
            "stamped carrier"
        );
        self.sink.write_all(&encoded)?;
        self.sink.flush()?;
        Ok(())
    }

    /// Maximum payload length this carrier holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Payload bytes buffered so far.
    pub fn buffered(&self) -> usize {
        match &self.state {
            State::Open { payload, .. } => payload.len(),
            State::Closed => 0,
        }
    }

    /// Payload bytes that can still be written. Zero once closed.
    pub fn remaining(&self) -> usize {
        match &self.state {
            State::Open { payload, .. } => self.capacity - payload.len(),
            State::Closed => 0,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Output container format.
    pub fn format(&self) -> C::Format {
        self.format
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write, C: ContainerCodec> Write for StegoWriter<W, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.write_payload(buf) {
            Ok(n) => Ok(n),
            Err(StegoError::ImageFull { written }) if written > 0 => Ok(written),
            Err(err) => Err(err.into()),
        }
    }

    /// Payload bytes only leave the writer in [`StegoWriter::finalize`].
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: Write, C: ContainerCodec> core::fmt::Debug for StegoWriter<W, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StegoWriter")
            .field("format", &self.format)
            .field("capacity", &self.capacity)
            .field("buffered", &self.buffered())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Configures codec and output format for a [`StegoWriter`].
#[derive(Clone, Debug)]
pub struct WriterBuilder<C: ContainerCodec = BitmapCodec> {
    codec: C,
    format: Option<C::Format>,
}

impl WriterBuilder<BitmapCodec> {
    pub fn new() -> Self {
        Self {
            codec: BitmapCodec::new(),
            format: None,
        }
    }

    /// Resource limits for decoding the cover.
    pub fn limits(self, limits: Limits) -> Self {
        Self {
            codec: BitmapCodec::with_limits(limits),
            ..self
        }
    }
}

impl Default for WriterBuilder<BitmapCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ContainerCodec> WriterBuilder<C> {
    /// Use another container codec. Resets the output format.
    pub fn codec<D: ContainerCodec>(self, codec: D) -> WriterBuilder<D> {
        WriterBuilder {
            codec,
            format: None,
        }
    }

    /// Output container format. Defaults to the cover's format.
    pub fn format(mut self, format: C::Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Decode `cover` and open a writer that will emit into `sink`.
    pub fn open<R: Read, W: Write>(
        self,
        mut cover: R,
        sink: W,
    ) -> Result<StegoWriter<W, C>, StegoError> {
        let mut data = Vec::new();
        cover.read_to_end(&mut data)?;
        let (grid, detected) = self.codec.decode(&data).map_err(StegoError::container)?;
        drop(data);
        self.open_grid(grid, detected, sink)
    }

    /// Open a writer over an already decoded cover. `source_format` is used
    /// when no output format was chosen.
    pub fn open_grid<W: Write>(
        self,
        cover: CarrierGrid,
        source_format: C::Format,
        sink: W,
    ) -> Result<StegoWriter<W, C>, StegoError> {
        let format = self.format.unwrap_or(source_format);
        if !self.codec.preserves_samples(format, cover.depth()) {
            return Err(StegoError::UnsupportedFormat(format!(
                "{format:?} cannot store {}-bit samples losslessly",
                cover.depth().bits()
            )));
        }
        let capacity = capacity(cover.width() as u32, cover.height() as u32)?;
        debug!(
            width = cover.width(),
            height = cover.height(),
            capacity,
            format = ?format,
            "opened stego writer"
        );
        Ok(StegoWriter {
            codec: self.codec,
            format,
            capacity,
            sink,
            state: State::Open {
                cover,
                payload: Vec::new(),
            },
        })
    }
}
