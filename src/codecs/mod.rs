//! Encoding and decoding of pixel buffers.
//!
//! A [Codec] handles one [ImageFormat]. Codecs are collected in
//! a [CodecRegistry], which selects a decoder by probing signatures
//! of the data and an encoder by the requested format.
use std::fmt;
use std::str::FromStr;

pub use raw::RawCodec;
pub use registry::CodecRegistry;

use crate::image_data::{CodecOptions, RawImageBytes};
use crate::last_error::track;
use crate::{CodecError, ImageError, PixelBuffer};

mod raw;
mod registry;

cfg_if::cfg_if! {
    if #[cfg(any(feature = "png", feature = "jpeg", feature = "bmp", feature = "webp"))] {
        mod image_crate;
        #[allow(unused_imports)]
        pub use image_crate::*;
    }
}

/// Tag of an encoded image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
    /// Uncompressed RGBA pixels with a small header, see [RawCodec].
    Raw,
    Webp,
}

impl ImageFormat {
    /// Lowercase name of the format.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Bmp => "bmp",
            Self::Raw => "raw",
            Self::Webp => "webp",
        }
    }

    /// Returns `false` for formats that lose pixel values
    /// or the alpha channel while encoding.
    pub fn is_lossless(&self) -> bool {
        !matches!(self, Self::Jpeg)
    }

    /// Checks the leading bytes of `data` for the signature of the format.
    pub fn matches_signature(&self, data: &[u8]) -> bool {
        match self {
            Self::Png => data.starts_with(b"\x89PNG\r\n\x1a\n"),
            Self::Jpeg => data.starts_with(&[0xFF, 0xD8, 0xFF]),
            Self::Bmp => data.starts_with(b"BM"),
            Self::Raw => data.starts_with(raw::RAW_MAGIC),
            Self::Webp => data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Bmp => "BMP",
            Self::Raw => "RAW",
            Self::Webp => "WebP",
        };
        f.write_str(name)
    }
}

impl FromStr for ImageFormat {
    type Err = ImageError;

    /// Parses a format name or a file extension, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.to_ascii_lowercase().as_str() {
            "png" => Self::Png,
            "jpeg" | "jpg" => Self::Jpeg,
            "bmp" => Self::Bmp,
            "raw" => Self::Raw,
            "webp" => Self::Webp,
            _ => return track(Err(ImageError::UnknownFormat(s.to_string()))),
        };
        Ok(format)
    }
}

/// Decoder and encoder of one image format.
pub trait Codec: Send + Sync {
    fn format(&self) -> ImageFormat;

    /// Returns `true` if `data` looks like an image of the codec's format.
    ///
    /// Must not have side effects. By default checks
    /// [signature](ImageFormat::matches_signature) of the format.
    fn probe(&self, data: &[u8]) -> bool {
        self.format().matches_signature(data)
    }

    /// Decodes `data` into `output`.
    ///
    /// Implementations allocate pixels with [PixelBuffer::reset] and must
    /// leave the buffer classified (see [PixelBuffer::detect_transparent]).
    fn decode(&self, data: &[u8], output: &mut PixelBuffer) -> Result<(), CodecError>;

    /// Encodes `image` by writing bytes into `output`.
    fn encode(
        &self,
        image: &PixelBuffer,
        options: &CodecOptions,
        output: &mut RawImageBytes,
    ) -> Result<(), CodecError>;
}

impl PixelBuffer {
    /// Decodes `data` with codecs of the [global](CodecRegistry::global)
    /// registry and replaces content of the buffer with the result.
    ///
    /// The buffer is left untouched on failure.
    pub fn load_from_buffer(&mut self, data: &[u8]) -> Result<(), ImageError> {
        let image = CodecRegistry::global().decode_auto_with(data, self.governor())?;
        *self = image;
        Ok(())
    }

    /// Encodes the buffer with the codec of the [global](CodecRegistry::global)
    /// registry registered for `format`.
    pub fn to_buffer(
        &self,
        format: ImageFormat,
        options: &CodecOptions,
    ) -> Result<RawImageBytes, ImageError> {
        CodecRegistry::global().encode_as_bytes(format, self, options)
    }
}
