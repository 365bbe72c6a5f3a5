use thiserror::Error;

use crate::codecs::ImageFormat;

/// Error of any fallible operation of the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImageError {
    #[error("Failed to allocate {0} bytes for pixels")]
    AllocationFailure(usize),
    #[error("Size {width}x{height} exceeds the limit {max_width}x{max_height}")]
    SizeLimitExceeded {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },
    #[error("No codec registered for {0} format")]
    UnsupportedFormat(ImageFormat),
    #[error("Unknown image format {0:?}")]
    UnknownFormat(String),
    #[error("Format of image data is not recognized")]
    UnrecognizedFormat,
    #[error("Unknown resize filter {0:?}")]
    InvalidFilter(String),
    #[error("Region doesn't intersect the image")]
    InvalidRegion,
    #[error("{format} codec failed: {message}")]
    CodecFailure {
        format: ImageFormat,
        message: String,
    },
}

impl ImageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AllocationFailure(_) => ErrorKind::AllocationFailure,
            Self::SizeLimitExceeded { .. } => ErrorKind::SizeLimitExceeded,
            Self::UnsupportedFormat(_) | Self::UnknownFormat(_) => ErrorKind::UnsupportedFormat,
            Self::UnrecognizedFormat => ErrorKind::UnrecognizedFormat,
            Self::InvalidFilter(_) => ErrorKind::InvalidFilter,
            Self::InvalidRegion => ErrorKind::InvalidRegion,
            Self::CodecFailure { .. } => ErrorKind::CodecFailure,
        }
    }
}

/// Kind of [ImageError] without details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    AllocationFailure,
    SizeLimitExceeded,
    UnsupportedFormat,
    UnrecognizedFormat,
    InvalidFilter,
    /// Informational: the requested region has an empty intersection
    /// with the image.
    InvalidRegion,
    CodecFailure,
}

/// Error returned by a [Codec](crate::Codec) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// The stream is corrupted, truncated or can't be produced.
    #[error("{0}")]
    Malformed(String),
    /// The codec was stopped by a failure of the core,
    /// e.g. the decoded image doesn't fit into size limits.
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl CodecError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    pub(crate) fn into_image_error(self, format: ImageFormat) -> ImageError {
        match self {
            Self::Malformed(message) => ImageError::CodecFailure { format, message },
            Self::Image(err) => err,
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
