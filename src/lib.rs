#![doc = include_str!("../README.md")]
//!
//! ## Feature flags
#![doc = document_features::document_features!()]

pub use alpha::merge;
pub use codecs::{Codec, CodecRegistry, ImageFormat, RawCodec};
#[cfg(feature = "bmp")]
pub use codecs::BmpCodec;
#[cfg(feature = "jpeg")]
pub use codecs::JpegCodec;
#[cfg(feature = "png")]
pub use codecs::PngCodec;
#[cfg(feature = "webp")]
pub use codecs::WebpCodec;
pub use convolution::FilterType;
pub use errors::*;
pub use governor::ResourceGovernor;
pub use image_data::{CodecOptions, RawImageBytes};
pub use images::{PixelBuffer, Transparency};
pub use last_error::{clear_last_error, last_error, LastError};
pub use pixels::Pixel;

#[macro_use]
mod utils;

mod alpha;
pub mod codecs;
mod convolution;
mod errors;
mod governor;
mod image_data;
mod images;
pub mod last_error;
mod pixels;
mod resizer;
#[cfg(feature = "for_testing")]
pub mod testing;
