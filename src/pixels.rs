//! Contains the pixel type used by all buffers of the crate.
use bytemuck::{Pod, Zeroable};

/// RGBA pixel with 8-bit components.
///
/// Components are independent, there is no premultiplication.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[inline(always)]
    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    #[inline(always)]
    pub(crate) fn components(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline(always)]
    pub(crate) fn from_components(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<[u8; 4]> for Pixel {
    fn from(value: [u8; 4]) -> Self {
        Self::from_components(value)
    }
}

impl From<Pixel> for [u8; 4] {
    fn from(value: Pixel) -> Self {
        value.components()
    }
}
