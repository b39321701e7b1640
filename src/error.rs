use enough::StopReason;

/// Errors from the embedding core.
///
/// Failures of the underlying container codec are carried unchanged in
/// [`StegoError::Container`], so "not a carrier" and "not an image" stay
/// distinguishable.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StegoError {
    #[error("carrier {width}x{height} is too small to hold the length header")]
    CarrierTooSmall { width: u32, height: u32 },

    #[error("carrier claims {claimed} payload bytes but only {available} fit")]
    TruncatedCarrier { claimed: u64, available: usize },

    /// Payload capacity was reached. `written` bytes of the call were still
    /// accepted and must be consulted before treating this as a failure.
    #[error("image full: {written} bytes accepted before capacity was reached")]
    ImageFull { written: usize },

    #[error("image is closed for writing")]
    ImageClosed,

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Container(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StegoError {
    pub(crate) fn container<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StegoError::Container(Box::new(err))
    }

    /// The container codec error, if this is one of type `E`.
    pub fn container_error<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            StegoError::Container(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

impl From<StegoError> for std::io::Error {
    fn from(err: StegoError) -> Self {
        use std::io::ErrorKind;
        match err {
            StegoError::Io(inner) => inner,
            StegoError::ImageFull { .. } => std::io::Error::new(ErrorKind::WriteZero, err),
            StegoError::ImageClosed => std::io::Error::new(ErrorKind::BrokenPipe, err),
            StegoError::TruncatedCarrier { .. } => {
                std::io::Error::new(ErrorKind::UnexpectedEof, err)
            }
            other => std::io::Error::new(ErrorKind::InvalidData, other),
        }
    }
}

/// Errors from the built-in bitmap container codecs.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("invalid pixel data: {0}")]
    InvalidData(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for BitmapError {
    fn from(r: StopReason) -> Self {
        BitmapError::Cancelled(r)
    }
}
