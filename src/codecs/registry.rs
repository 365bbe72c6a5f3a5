use std::fmt;

use log::{debug, warn};
use once_cell::sync::Lazy;

use crate::codecs::{Codec, ImageFormat, RawCodec};
use crate::governor::ResourceGovernor;
use crate::image_data::{CodecOptions, RawImageBytes};
use crate::last_error::track;
use crate::{ImageError, PixelBuffer};

static GLOBAL_REGISTRY: Lazy<CodecRegistry> = Lazy::new(CodecRegistry::with_default_codecs);

/// Collection of codecs with at most one codec per format.
///
/// Decoders are probed starting from the most recently registered codec;
/// the first codec that recognizes the data decodes it, there is no
/// fallback to other codecs if decoding fails.
pub struct CodecRegistry {
    codecs: Vec<Box<dyn Codec>>,
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_default_codecs()
    }
}

impl CodecRegistry {
    /// Creates a registry without codecs.
    pub fn new() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Creates a registry with all codecs enabled by features of the crate.
    ///
    /// Codecs are registered in order WebP, RAW, BMP, JPEG, PNG, so PNG
    /// is probed first.
    pub fn with_default_codecs() -> Self {
        let mut registry = Self::new();
        #[cfg(feature = "webp")]
        registry.register(super::WebpCodec);
        registry.register(RawCodec);
        #[cfg(feature = "bmp")]
        registry.register(super::BmpCodec);
        #[cfg(feature = "jpeg")]
        registry.register(super::JpegCodec);
        #[cfg(feature = "png")]
        registry.register(super::PngCodec);
        registry
    }

    /// Registry used by [PixelBuffer::load_from_buffer] and
    /// [PixelBuffer::to_buffer]. Built on first use.
    pub fn global() -> &'static Self {
        &GLOBAL_REGISTRY
    }

    /// Adds a codec to the registry.
    ///
    /// A codec previously registered for the same format is replaced,
    /// the new one becomes the first to be probed.
    pub fn register(&mut self, codec: impl Codec + 'static) {
        self.register_boxed(Box::new(codec));
    }

    pub fn register_boxed(&mut self, codec: Box<dyn Codec>) {
        let format = codec.format();
        let count = self.codecs.len();
        self.codecs.retain(|c| c.format() != format);
        if self.codecs.len() != count {
            debug!("Replace codec of {format} format");
        } else {
            debug!("Register codec of {format} format");
        }
        self.codecs.push(codec);
    }

    /// Returns the codec registered for `format`.
    pub fn get(&self, format: ImageFormat) -> Option<&dyn Codec> {
        self.codecs
            .iter()
            .find(|c| c.format() == format)
            .map(|c| &**c)
    }

    /// Registered formats in the order of probing.
    pub fn formats(&self) -> Vec<ImageFormat> {
        self.codecs.iter().rev().map(|c| c.format()).collect()
    }

    /// Returns format of the first codec that recognizes `data`.
    pub fn detect(&self, data: &[u8]) -> Option<ImageFormat> {
        self.find_decoder(data).map(|c| c.format())
    }

    fn find_decoder(&self, data: &[u8]) -> Option<&dyn Codec> {
        self.codecs
            .iter()
            .rev()
            .find(|codec| {
                test_log!("probe {}", codec.format().name());
                codec.probe(data)
            })
            .map(|c| &**c)
    }

    /// Decodes `data` into a new buffer bound to the global governor.
    pub fn decode_auto(&self, data: &[u8]) -> Result<PixelBuffer, ImageError> {
        self.decode_auto_with(data, ResourceGovernor::global())
    }

    /// Decodes `data` into a new buffer bound to `governor`.
    ///
    /// Returns [ImageError::UnrecognizedFormat] if no codec recognizes data
    /// and [ImageError::CodecFailure] if the selected codec fails.
    pub fn decode_auto_with(
        &self,
        data: &[u8],
        governor: &'static ResourceGovernor,
    ) -> Result<PixelBuffer, ImageError> {
        track(self.decode_inner(data, governor))
    }

    fn decode_inner(
        &self,
        data: &[u8],
        governor: &'static ResourceGovernor,
    ) -> Result<PixelBuffer, ImageError> {
        let Some(codec) = self.find_decoder(data) else {
            debug!("Format of {} bytes of image data is not recognized", data.len());
            return Err(ImageError::UnrecognizedFormat);
        };
        let format = codec.format();
        test_log!("decode {}", format.name());
        debug!("Decode {} bytes as {format} image", data.len());

        let mut image = PixelBuffer::empty_with_governor(governor);
        codec.decode(data, &mut image).map_err(|err| {
            warn!("Failed to decode {format} image: {err}");
            err.into_image_error(format)
        })?;
        Ok(image)
    }

    /// Encodes `image` with the codec registered for `format`.
    ///
    /// The previous content of `output` is replaced only if encoding
    /// succeeds. On success position of `output` is set to the start.
    pub fn encode_as(
        &self,
        format: ImageFormat,
        image: &PixelBuffer,
        options: &CodecOptions,
        output: &mut RawImageBytes,
    ) -> Result<(), ImageError> {
        *output = self.encode_as_bytes(format, image, options)?;
        Ok(())
    }

    /// Encodes `image` with the codec registered for `format`
    /// into a new byte container.
    pub fn encode_as_bytes(
        &self,
        format: ImageFormat,
        image: &PixelBuffer,
        options: &CodecOptions,
    ) -> Result<RawImageBytes, ImageError> {
        track(self.encode_inner(format, image, options))
    }

    fn encode_inner(
        &self,
        format: ImageFormat,
        image: &PixelBuffer,
        options: &CodecOptions,
    ) -> Result<RawImageBytes, ImageError> {
        let codec = self
            .get(format)
            .ok_or(ImageError::UnsupportedFormat(format))?;
        test_log!("encode {}", format.name());
        debug!(
            "Encode {}x{} image as {format}",
            image.width(),
            image.height()
        );

        let mut encoded = RawImageBytes::new();
        codec.encode(image, options, &mut encoded).map_err(|err| {
            warn!("Failed to encode {format} image: {err}");
            err.into_image_error(format)
        })?;
        encoded.set_position(0);
        Ok(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodecError;

    #[cfg(all(feature = "png", feature = "jpeg", feature = "bmp", feature = "webp"))]
    #[test]
    fn default_probe_order() {
        let registry = CodecRegistry::with_default_codecs();
        assert_eq!(
            registry.formats(),
            vec![
                ImageFormat::Png,
                ImageFormat::Jpeg,
                ImageFormat::Bmp,
                ImageFormat::Raw,
                ImageFormat::Webp,
            ]
        );
    }

    struct NullCodec(ImageFormat);

    impl Codec for NullCodec {
        fn format(&self) -> ImageFormat {
            self.0
        }

        fn decode(&self, _data: &[u8], _output: &mut PixelBuffer) -> Result<(), CodecError> {
            Err(CodecError::malformed("no data"))
        }

        fn encode(
            &self,
            _image: &PixelBuffer,
            _options: &CodecOptions,
            _output: &mut RawImageBytes,
        ) -> Result<(), CodecError> {
            Ok(())
        }
    }

    #[test]
    fn reregistration_replaces_codec() {
        let mut registry = CodecRegistry::new();
        registry.register(RawCodec);
        registry.register(NullCodec(ImageFormat::Png));
        registry.register(RawCodec);
        assert_eq!(registry.formats(), vec![ImageFormat::Raw, ImageFormat::Png]);
    }

    #[test]
    fn empty_registry() {
        let registry = CodecRegistry::new();
        assert!(registry.get(ImageFormat::Png).is_none());
        assert_eq!(registry.detect(b"\x89PNG\r\n\x1a\n"), None);
    }
}
