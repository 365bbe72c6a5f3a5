use std::mem::size_of;

use crate::convolution::{self, FilterFn, FilterType};
use crate::pixels::Pixel;
use crate::{ImageError, PixelBuffer};

/// Resamples pixels of `src` into `dst`, which is already allocated
/// with the destination dimensions.
///
/// Both buffers must have pixels.
pub(crate) fn resample(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    filter_type: FilterType,
) -> Result<(), ImageError> {
    if src.width() == dst.width() && src.height() == dst.height() {
        test_log!("copy pixels without resampling");
        dst.pixels_mut().copy_from_slice(src.pixels());
        return Ok(());
    }
    match convolution::get_filter_func(filter_type) {
        None => {
            resample_nearest(src, dst);
            Ok(())
        }
        Some((filter_fn, filter_support)) => {
            resample_convolution(src, dst, filter_fn, filter_support)
        }
    }
}

fn resample_nearest(src: &PixelBuffer, dst: &mut PixelBuffer) {
    let src_width = src.width() as usize;
    let dst_width = dst.width();
    let x_scale = src.width() as f64 / dst_width as f64;
    let y_scale = src.height() as f64 / dst.height() as f64;

    // Pretabulate horizontal pixel positions
    let x_in_start = x_scale * 0.5;
    let max_src_x = src_width - 1;
    let x_in_tab: Vec<usize> = (0..dst_width)
        .map(|x| ((x_in_start + x_scale * x as f64) as usize).min(max_src_x))
        .collect();

    let y_in_start = y_scale * 0.5;
    let max_src_y = src.height() as usize - 1;
    for (y, out_row) in dst.rows_mut().enumerate() {
        let y_in = ((y_in_start + y_scale * y as f64) as usize).min(max_src_y);
        let in_row = &src.pixels()[y_in * src_width..(y_in + 1) * src_width];
        for (&x_in, out_pixel) in x_in_tab.iter().zip(out_row.iter_mut()) {
            *out_pixel = in_row[x_in];
        }
    }
}

fn resample_convolution(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    filter_fn: FilterFn,
    filter_support: f64,
) -> Result<(), ImageError> {
    let src_width = src.width() as usize;
    let dst_width = dst.width() as usize;

    let need_horizontal = dst.width() != src.width();
    let horiz_coeffs = need_horizontal.then(|| {
        test_log!("compute horizontal convolution coefficients");
        convolution::precompute_coefficients(src.width(), dst.width(), filter_fn, filter_support)
    });

    let need_vertical = dst.height() != src.height();
    let vert_coeffs = need_vertical.then(|| {
        test_log!("compute vertical convolution coefficients");
        convolution::precompute_coefficients(src.height(), dst.height(), filter_fn, filter_support)
    });

    match (horiz_coeffs, vert_coeffs) {
        (Some(horiz_coeffs), Some(mut vert_coeffs)) => {
            // Only rows used by the vertical pass are resampled horizontally.
            let (y_first, y_last) = vert_coeffs.used_range().unwrap_or((0, src.height()));
            let temp_height = (y_last - y_first) as usize;
            let mut temp = temp_pixels(dst_width * temp_height)?;
            convolution::horiz_convolution(
                src.pixels(),
                src_width,
                y_first as usize,
                &mut temp,
                dst_width,
                &horiz_coeffs,
            );
            vert_coeffs.shift(y_first);
            convolution::vert_convolution(&temp, dst.pixels_mut(), dst_width, &vert_coeffs);
        }
        (Some(horiz_coeffs), None) => {
            convolution::horiz_convolution(
                src.pixels(),
                src_width,
                0,
                dst.pixels_mut(),
                dst_width,
                &horiz_coeffs,
            );
        }
        (None, Some(vert_coeffs)) => {
            convolution::vert_convolution(src.pixels(), dst.pixels_mut(), dst_width, &vert_coeffs);
        }
        (None, None) => dst.pixels_mut().copy_from_slice(src.pixels()),
    }
    Ok(())
}

/// Intermediate image of the two-pass resampling.
///
/// The memory is short-living and is not charged to a governor.
fn temp_pixels(count: usize) -> Result<Vec<Pixel>, ImageError> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(count)
        .map_err(|_| ImageError::AllocationFailure(count.saturating_mul(size_of::<Pixel>())))?;
    pixels.resize(count, Pixel::TRANSPARENT);
    Ok(pixels)
}
