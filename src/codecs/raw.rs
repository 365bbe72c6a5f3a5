use std::io::Write;

use crate::codecs::{Codec, ImageFormat};
use crate::image_data::{CodecOptions, RawImageBytes};
use crate::{CodecError, PixelBuffer};

pub(crate) const RAW_MAGIC: &[u8; 8] = b"RGBARAW\0";
const HEADER_SIZE: usize = RAW_MAGIC.len() + 8;

/// Codec of the uncompressed format.
///
/// Layout of the stream:
///
/// | Offset | Size | Content                              |
/// |--------|------|--------------------------------------|
/// | 0      | 8    | magic `RGBARAW\0`                    |
/// | 8      | 4    | width, little-endian `u32`           |
/// | 12     | 4    | height, little-endian `u32`          |
/// | 16     | w*h*4| pixels row by row in R, G, B, A order |
///
/// The codec doesn't depend on any optional feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawCodec;

impl Codec for RawCodec {
    fn format(&self) -> ImageFormat {
        ImageFormat::Raw
    }

    fn decode(&self, data: &[u8], output: &mut PixelBuffer) -> Result<(), CodecError> {
        if data.len() < HEADER_SIZE || !data.starts_with(RAW_MAGIC) {
            return Err(CodecError::malformed("RAW header is truncated"));
        }
        let width = read_u32(&data[8..12]);
        let height = read_u32(&data[12..16]);
        let payload = &data[HEADER_SIZE..];

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|count| count.checked_mul(4))
            .ok_or_else(|| CodecError::malformed("RAW image dimensions are too big"))?;
        if payload.len() != expected {
            return Err(CodecError::Malformed(format!(
                "RAW image {width}x{height} requires {expected} bytes of pixels, got {}",
                payload.len()
            )));
        }

        output.reset(width, height)?;
        output.as_bytes_mut().copy_from_slice(payload);
        output.detect_transparent();
        Ok(())
    }

    fn encode(
        &self,
        image: &PixelBuffer,
        _options: &CodecOptions,
        output: &mut RawImageBytes,
    ) -> Result<(), CodecError> {
        output.write_all(RAW_MAGIC)?;
        output.write_all(&image.width().to_le_bytes())?;
        output.write_all(&image.height().to_le_bytes())?;
        output.write_all(image.as_bytes())?;
        Ok(())
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}
