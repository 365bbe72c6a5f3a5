//! Codecs backed by the `image` crate.
use std::borrow::Cow;
use std::io::Cursor;

use image::{ColorType, DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder};

use crate::codecs::{Codec, ImageFormat};
use crate::image_data::{CodecOptions, RawImageBytes};
use crate::{CodecError, PixelBuffer, Transparency};

impl From<image::ImageError> for CodecError {
    fn from(err: image::ImageError) -> Self {
        Self::Malformed(err.to_string())
    }
}

macro_rules! image_crate_codec {
    ($(#[$meta:meta])* $name:ident, $feature:literal, $format:expr, $image_format:expr, $encode:ident) => {
        $(#[$meta])*
        #[cfg(feature = $feature)]
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $name;

        #[cfg(feature = $feature)]
        impl Codec for $name {
            fn format(&self) -> ImageFormat {
                $format
            }

            fn decode(&self, data: &[u8], output: &mut PixelBuffer) -> Result<(), CodecError> {
                decode_with(data, $image_format, output)
            }

            fn encode(
                &self,
                image: &PixelBuffer,
                _options: &CodecOptions,
                output: &mut RawImageBytes,
            ) -> Result<(), CodecError> {
                $encode(image, output)
            }
        }
    };
}

image_crate_codec!(
    /// PNG codec. Opaque images are encoded without the alpha channel.
    PngCodec,
    "png",
    ImageFormat::Png,
    image::ImageFormat::Png,
    encode_png
);
image_crate_codec!(
    /// JPEG codec. The alpha channel is dropped while encoding.
    JpegCodec,
    "jpeg",
    ImageFormat::Jpeg,
    image::ImageFormat::Jpeg,
    encode_jpeg
);
image_crate_codec!(
    /// BMP codec.
    BmpCodec,
    "bmp",
    ImageFormat::Bmp,
    image::ImageFormat::Bmp,
    encode_bmp
);
image_crate_codec!(
    /// WebP codec. Images are always encoded losslessly.
    WebpCodec,
    "webp",
    ImageFormat::Webp,
    image::ImageFormat::WebP,
    encode_webp
);

fn decode_with(
    data: &[u8],
    format: image::ImageFormat,
    output: &mut PixelBuffer,
) -> Result<(), CodecError> {
    // The PNG decoder reads up to the image data before it reports
    // dimensions, so the header is checked against the limits first.
    if let Some((width, height)) = declared_dimensions(format, data) {
        output.governor().check_dimensions(width, height)?;
    }

    let decoder = image::ImageReader::with_format(Cursor::new(data), format).into_decoder()?;
    let (width, height) = decoder.dimensions();
    output.reset(width, height)?;
    if decoder.color_type() == ColorType::Rgba8 {
        decoder.read_image(output.as_bytes_mut())?;
    } else {
        let decoded = DynamicImage::from_decoder(decoder)?.into_rgba8();
        output.as_bytes_mut().copy_from_slice(decoded.as_raw());
    }
    output.detect_transparent();
    Ok(())
}

/// Returns dimensions stored in the header of the image, if they can be
/// read without a decoder.
fn declared_dimensions(format: image::ImageFormat, data: &[u8]) -> Option<(u32, u32)> {
    match format {
        // 8 bytes of signature, then IHDR chunk with big-endian width and height.
        image::ImageFormat::Png if data.len() >= 24 && &data[12..16] == b"IHDR" => {
            let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
            let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
            Some((width, height))
        }
        _ => None,
    }
}

/// Returns bytes of pixels and their layout as expected by an encoder.
///
/// Opaque images (or any image, if the encoder doesn't support alpha)
/// are passed without the alpha channel.
fn encoder_input(image: &PixelBuffer, with_alpha: bool) -> (Cow<'_, [u8]>, ExtendedColorType) {
    if with_alpha && image.transparency() != Transparency::Solid {
        return (Cow::Borrowed(image.as_bytes()), ExtendedColorType::Rgba8);
    }
    let rgb: Vec<u8> = image
        .pixels()
        .iter()
        .flat_map(|p| [p.r, p.g, p.b])
        .collect();
    (Cow::Owned(rgb), ExtendedColorType::Rgb8)
}

#[cfg(feature = "png")]
fn encode_png(image: &PixelBuffer, output: &mut RawImageBytes) -> Result<(), CodecError> {
    let (buf, color_type) = encoder_input(image, true);
    image::codecs::png::PngEncoder::new(output).write_image(
        &buf,
        image.width(),
        image.height(),
        color_type,
    )?;
    Ok(())
}

#[cfg(feature = "jpeg")]
fn encode_jpeg(image: &PixelBuffer, output: &mut RawImageBytes) -> Result<(), CodecError> {
    let (buf, color_type) = encoder_input(image, false);
    image::codecs::jpeg::JpegEncoder::new(output).write_image(
        &buf,
        image.width(),
        image.height(),
        color_type,
    )?;
    Ok(())
}

#[cfg(feature = "bmp")]
fn encode_bmp(image: &PixelBuffer, output: &mut RawImageBytes) -> Result<(), CodecError> {
    let (buf, color_type) = encoder_input(image, true);
    image::codecs::bmp::BmpEncoder::new(output).write_image(
        &buf,
        image.width(),
        image.height(),
        color_type,
    )?;
    Ok(())
}

#[cfg(feature = "webp")]
fn encode_webp(image: &PixelBuffer, output: &mut RawImageBytes) -> Result<(), CodecError> {
    let (buf, color_type) = encoder_input(image, true);
    image::codecs::webp::WebPEncoder::new_lossless(output).write_image(
        &buf,
        image.width(),
        image.height(),
        color_type,
    )?;
    Ok(())
}
