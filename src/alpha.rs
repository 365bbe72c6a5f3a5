//! Source-over compositing of 8-bit RGBA pixels.
//!
//! All arithmetic is done with integers and truncating division, so results
//! are reproducible bit-for-bit on every platform.
use crate::pixels::Pixel;

/// Composites `overlay` over `base` and returns the resulting pixel.
///
/// ```text
/// out_a = o.a + b.a * (255 - o.a) / 255
/// out_c = (o.c * o.a + b.c * b.a * (255 - o.a) / 255) / out_a
/// ```
///
/// A fully opaque overlay replaces the base, a fully transparent
/// overlay leaves it untouched. If the resulting alpha is zero
/// the result is transparent black.
#[inline]
pub fn merge(base: Pixel, overlay: Pixel) -> Pixel {
    match overlay.a {
        255 => return overlay,
        0 => return base,
        _ => (),
    }

    let overlay_a = overlay.a as u32;
    let rest = 255 - overlay_a;
    let base_a = base.a as u32;
    let out_a = overlay_a + base_a * rest / 255;
    if out_a == 0 {
        return Pixel::TRANSPARENT;
    }

    let channel = |o: u8, b: u8| -> u8 {
        let value = (o as u32 * overlay_a + b as u32 * base_a * rest / 255) / out_a;
        value.min(255) as u8
    };
    Pixel::new(
        channel(overlay.r, base.r),
        channel(overlay.g, base.g),
        channel(overlay.b, base.b),
        out_a as u8,
    )
}

impl Pixel {
    /// Composites `overlay` over this pixel in place.
    #[inline]
    pub fn merge(&mut self, overlay: Pixel) {
        *self = merge(*self, overlay);
    }
}

/// Composites a row of source pixels over a row of destination pixels.
#[inline]
pub(crate) fn merge_row(dst_row: &mut [Pixel], src_row: &[Pixel]) {
    for (dst_pixel, &src_pixel) in dst_row.iter_mut().zip(src_row) {
        dst_pixel.merge(src_pixel);
    }
}
