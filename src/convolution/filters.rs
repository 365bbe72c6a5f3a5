use std::fmt;
use std::str::FromStr;

use crate::ImageError;

pub(crate) type FilterFn = fn(f64) -> f64;

/// Resampling algorithm used by [PixelBuffer::resize](crate::PixelBuffer::resize).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FilterType {
    /// Each pixel of the destination image takes the value of the closest
    /// pixel of the source image.
    Nearest,
    /// Bilinear filter calculates the output pixel value using linear
    /// interpolation on all pixels that may contribute to the output value.
    /// For downscaling the kernel grows with the scale factor, so every
    /// source pixel contributes.
    #[default]
    Bilinear,
}

impl FilterType {
    /// Name of the filter as accepted by [FromStr].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterType {
    type Err = ImageError;

    /// Parses a filter name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("nearest") {
            Ok(Self::Nearest)
        } else if s.eq_ignore_ascii_case("bilinear") {
            Ok(Self::Bilinear)
        } else {
            Err(ImageError::InvalidFilter(s.to_string()))
        }
    }
}

/// Returns the filter function and value of `filter_support`
/// for convolution-based filters.
#[inline]
pub(crate) fn get_filter_func(filter_type: FilterType) -> Option<(FilterFn, f64)> {
    match filter_type {
        FilterType::Nearest => None,
        FilterType::Bilinear => Some((bilinear_filter, 1.0)),
    }
}

#[inline]
fn bilinear_filter(mut x: f64) -> f64 {
    x = x.abs();
    if x < 1.0 {
        1.0 - x
    } else {
        0.0
    }
}
