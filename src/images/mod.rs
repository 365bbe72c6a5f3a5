//! Contains the pixel buffer and its classification.
pub use pixel_buffer::*;

mod pixel_buffer;

/// Cached summary of whether the alpha channel of a buffer carries information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transparency {
    /// The buffer has no pixels.
    Empty,
    /// Some pixels may be not fully opaque.
    ///
    /// Buffers which were never classified are treated this way.
    Alpha,
    /// All pixels are fully opaque.
    Solid,
}

impl Transparency {
    #[inline]
    pub(crate) fn for_area(pixels_count: usize) -> Self {
        if pixels_count == 0 {
            Self::Empty
        } else {
            Self::Alpha
        }
    }

    /// Classification of a buffer filled with pixels of the given alpha.
    #[inline]
    pub(crate) fn for_alpha(alpha: u8) -> Self {
        if alpha == 255 {
            Self::Solid
        } else {
            Self::Alpha
        }
    }
}
