pub use filters::*;

use crate::pixels::Pixel;

mod filters;

/// Number of fractional bits of fixed-point coefficients.
const PRECISION_BITS: u32 = 16;
const ONE: i32 = 1 << PRECISION_BITS;
const HALF: i32 = 1 << (PRECISION_BITS - 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bound {
    pub start: u32,
    pub size: u32,
}

/// Fixed-point weights of source pixels for every destination pixel
/// along one axis.
///
/// Weights of every window sum exactly to `1 << PRECISION_BITS`,
/// so a uniform source stays uniform after resampling.
#[derive(Debug, Clone, Default)]
pub(crate) struct Coefficients {
    pub values: Vec<i32>,
    pub bounds: Vec<Bound>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CoefficientsChunk<'a> {
    pub start: u32,
    pub values: &'a [i32],
}

impl Coefficients {
    pub fn get_chunks(&self) -> Vec<CoefficientsChunk<'_>> {
        let mut coeffs = self.values.as_slice();
        let mut res = Vec::with_capacity(self.bounds.len());
        for bound in &self.bounds {
            let (left, right) = coeffs.split_at(bound.size as usize);
            coeffs = right;
            res.push(CoefficientsChunk {
                start: bound.start,
                values: left,
            });
        }
        res
    }

    /// First and last-plus-one source positions used by any window.
    pub fn used_range(&self) -> Option<(u32, u32)> {
        let first = self.bounds.first()?;
        let last = self.bounds.last()?;
        Some((first.start, last.start + last.size))
    }

    /// Moves all windows `offset` positions towards the start.
    pub fn shift(&mut self, offset: u32) {
        for bound in self.bounds.iter_mut() {
            bound.start -= offset;
        }
    }
}

pub(crate) fn precompute_coefficients(
    in_size: u32,
    out_size: u32,
    filter: FilterFn,
    filter_support: f64,
) -> Coefficients {
    if in_size == 0 || out_size == 0 {
        return Coefficients::default();
    }
    let scale = in_size as f64 / out_size as f64;
    // Kernel grows for downscaling, so that every source pixel contributes.
    let filter_scale = scale.max(1.0);
    let filter_radius = filter_support * filter_scale;
    let recip_filter_scale = 1.0 / filter_scale;

    let window_size = filter_radius.ceil() as usize * 2 + 1;
    let mut values: Vec<i32> = Vec::with_capacity(window_size * out_size as usize);
    let mut bounds: Vec<Bound> = Vec::with_capacity(out_size as usize);
    let mut weights: Vec<f64> = Vec::with_capacity(window_size + 1);

    for out_x in 0..out_size {
        // Point of the source corresponding to the center
        // of the current destination pixel.
        let in_center = (out_x as f64 + 0.5) * scale;
        // Invariant: 0 <= x_min < x_max <= in_size
        let x_min = (in_center - filter_radius).floor().max(0.) as u32;
        let x_max = ((in_center + filter_radius).ceil().min(in_size as f64) as u32).max(x_min + 1);
        // (x + 0.5) - in_center => x - center
        let center = in_center - 0.5;

        weights.clear();
        weights.extend((x_min..x_max).map(|x| filter((x as f64 - center) * recip_filter_scale)));
        // Zero weights at both ends of the window are not used.
        let first = weights.iter().position(|&w| w != 0.).unwrap_or(0);
        let last = weights.iter().rposition(|&w| w != 0.).map_or(1, |i| i + 1);
        let window = &weights[first..last];

        let cur_index = values.len();
        let ww: f64 = window.iter().sum();
        if ww > 0. {
            values.extend(window.iter().map(|&w| (w / ww * ONE as f64).round() as i32));
        } else {
            values.extend(window.iter().map(|_| 0));
        }
        fix_rounding(&mut values[cur_index..]);

        bounds.push(Bound {
            start: x_min + first as u32,
            size: window.len() as u32,
        });
    }

    Coefficients { values, bounds }
}

/// Moves the rounding error of a window into its biggest weight.
fn fix_rounding(window: &mut [i32]) {
    let diff = ONE - window.iter().sum::<i32>();
    if diff == 0 {
        return;
    }
    let biggest = window
        .iter_mut()
        .reduce(|max, w| if *w > *max { w } else { max });
    if let Some(w) = biggest {
        *w += diff;
    }
}

#[inline(always)]
fn convolve(pixels: impl Iterator<Item = Pixel>, coeffs: &[i32]) -> Pixel {
    let mut ss = [HALF; 4];
    for (pixel, &k) in pixels.zip(coeffs) {
        for (s, c) in ss.iter_mut().zip(pixel.components()) {
            *s += c as i32 * k;
        }
    }
    Pixel::from_components(ss.map(clip8))
}

#[inline(always)]
fn clip8(v: i32) -> u8 {
    (v >> PRECISION_BITS).clamp(0, 255) as u8
}

/// Resamples every row of `src` into the row of `dst` with the same index.
///
/// `first_row` is the index of the first source row to use.
pub(crate) fn horiz_convolution(
    src: &[Pixel],
    src_width: usize,
    first_row: usize,
    dst: &mut [Pixel],
    dst_width: usize,
    coeffs: &Coefficients,
) {
    let chunks = coeffs.get_chunks();
    let src_rows = src.chunks_exact(src_width).skip(first_row);
    for (src_row, dst_row) in src_rows.zip(dst.chunks_exact_mut(dst_width)) {
        for (chunk, dst_pixel) in chunks.iter().zip(dst_row.iter_mut()) {
            let start = chunk.start as usize;
            let src_pixels = &src_row[start..start + chunk.values.len()];
            *dst_pixel = convolve(src_pixels.iter().copied(), chunk.values);
        }
    }
}

/// Resamples every column of `src` into the column of `dst` with the same index.
pub(crate) fn vert_convolution(
    src: &[Pixel],
    dst: &mut [Pixel],
    width: usize,
    coeffs: &Coefficients,
) {
    let chunks = coeffs.get_chunks();
    for (chunk, dst_row) in chunks.iter().zip(dst.chunks_exact_mut(width)) {
        let start = chunk.start as usize;
        for (x, dst_pixel) in dst_row.iter_mut().enumerate() {
            let column = (start..start + chunk.values.len()).map(|y| src[y * width + x]);
            *dst_pixel = convolve(column, chunk.values);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bilinear_coeffs(in_size: u32, out_size: u32) -> Coefficients {
        let (filter, support) = get_filter_func(FilterType::Bilinear).unwrap();
        precompute_coefficients(in_size, out_size, filter, support)
    }

    #[test]
    fn windows_sum_to_one() {
        for (in_size, out_size) in [(1, 7), (2, 4), (3, 1), (7, 3), (100, 33), (33, 100), (5, 5)] {
            let coeffs = bilinear_coeffs(in_size, out_size);
            assert_eq!(coeffs.bounds.len(), out_size as usize);
            for chunk in coeffs.get_chunks() {
                assert!(!chunk.values.is_empty());
                assert!(chunk.start + chunk.values.len() as u32 <= in_size);
                assert_eq!(chunk.values.iter().sum::<i32>(), ONE, "{in_size} -> {out_size}");
            }
        }
    }

    #[test]
    fn upscale_two_to_four() {
        let coeffs = bilinear_coeffs(2, 4);
        assert_eq!(
            coeffs.bounds,
            vec![
                Bound { start: 0, size: 1 },
                Bound { start: 0, size: 2 },
                Bound { start: 0, size: 2 },
                Bound { start: 1, size: 1 },
            ]
        );
        let chunks = coeffs.get_chunks();
        assert_eq!(chunks[1].values, &[49152, 16384]);
        assert_eq!(chunks[2].values, &[16384, 49152]);
    }

    #[test]
    fn downscale_uses_every_pixel() {
        let coeffs = bilinear_coeffs(4, 1);
        assert_eq!(coeffs.bounds, vec![Bound { start: 0, size: 4 }]);
        assert_eq!(coeffs.used_range(), Some((0, 4)));
    }

    #[test]
    fn empty_sizes() {
        assert!(bilinear_coeffs(0, 4).bounds.is_empty());
        assert!(bilinear_coeffs(4, 0).bounds.is_empty());
        assert_eq!(bilinear_coeffs(4, 0).used_range(), None);
    }

    #[test]
    fn rounding_error_goes_to_biggest_weight() {
        let mut window = [10000, 30000, 25535];
        fix_rounding(&mut window);
        assert_eq!(window, [10000, 30001, 25535]);
    }
}
