#![allow(dead_code)]

use raster_core::{Pixel, PixelBuffer, ResourceGovernor};

pub fn solid(
    width: u32,
    height: u32,
    color: Pixel,
    governor: &'static ResourceGovernor,
) -> PixelBuffer {
    let mut image = PixelBuffer::with_governor(width, height, governor).unwrap();
    image.fill(color);
    image
}

/// Image with a pattern of distinct pixels, including fully transparent
/// and half-transparent ones.
pub fn checker(width: u32, height: u32, governor: &'static ResourceGovernor) -> PixelBuffer {
    let mut image = PixelBuffer::with_governor(width, height, governor).unwrap();
    for (y, row) in image.rows_mut().enumerate() {
        for (x, pixel) in row.iter_mut().enumerate() {
            let alpha = match (x + y) % 3 {
                0 => 255,
                1 => 128,
                _ => 0,
            };
            *pixel = Pixel::new((x * 17) as u8, (y * 29) as u8, ((x + y) * 7) as u8, alpha);
        }
    }
    image.detect_transparent();
    image
}

pub fn image_checksum(image: &PixelBuffer) -> [u64; 4] {
    let mut res = [0u64; 4];
    for pixel in image.as_bytes().chunks_exact(4) {
        res.iter_mut().zip(pixel).for_each(|(d, &s)| *d += s as u64);
    }
    res
}

/// Encodes RGBA bytes into PNG without using the crate under test.
pub fn reference_png(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(rgba).unwrap();
    }
    data
}
