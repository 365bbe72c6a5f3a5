use std::mem::size_of;
use std::slice::{ChunksExact, ChunksExactMut};

use crate::alpha::merge_row;
use crate::governor::ResourceGovernor;
use crate::images::Transparency;
use crate::last_error::track;
use crate::pixels::Pixel;
use crate::{resizer, FilterType, ImageError};

/// Owned 2D array of RGBA pixels.
///
/// Pixels are stored row by row. Storage exists only if both dimensions
/// are non-zero, a zero-area buffer is [Empty](Transparency::Empty).
///
/// Operations which change dimensions build new storage first and replace
/// the old one only on success, so a failed operation leaves the buffer
/// in its previous state.
#[derive(Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
    transparency: Transparency,
    charged: usize,
    governor: &'static ResourceGovernor,
}

impl PixelBuffer {
    /// Allocates a buffer of transparent black pixels using
    /// the global [ResourceGovernor].
    pub fn new(width: u32, height: u32) -> Result<Self, ImageError> {
        Self::with_governor(width, height, ResourceGovernor::global())
    }

    /// Allocates a buffer of transparent black pixels charged to the given governor.
    pub fn with_governor(
        width: u32,
        height: u32,
        governor: &'static ResourceGovernor,
    ) -> Result<Self, ImageError> {
        track(Self::allocate(width, height, governor))
    }

    /// Creates a buffer without pixels.
    pub fn empty() -> Self {
        Self::empty_with_governor(ResourceGovernor::global())
    }

    pub fn empty_with_governor(governor: &'static ResourceGovernor) -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
            transparency: Transparency::Empty,
            charged: 0,
            governor,
        }
    }

    fn allocate(
        width: u32,
        height: u32,
        governor: &'static ResourceGovernor,
    ) -> Result<Self, ImageError> {
        governor.check_dimensions(width, height)?;
        let cost = ResourceGovernor::buffer_cost(width, height)?;
        let pixels_count = if cost == 0 {
            0
        } else {
            width as usize * height as usize
        };
        let pixels = alloc_pixels(pixels_count)?;
        governor.charge(cost);
        Ok(Self {
            width,
            height,
            pixels,
            transparency: Transparency::for_area(pixels_count),
            charged: cost,
            governor,
        })
    }

    /// Replaces the buffer with transparent black pixels of new dimensions.
    ///
    /// Used by decoders to get storage for decoded pixels.
    pub fn reset(&mut self, width: u32, height: u32) -> Result<(), ImageError> {
        *self = track(Self::allocate(width, height, self.governor))?;
        Ok(())
    }

    /// Releases pixels and returns their memory to the governor.
    ///
    /// The buffer becomes [Empty](Transparency::Empty). Calling this
    /// for an already freed buffer does nothing.
    pub fn free(&mut self) {
        if self.charged > 0 {
            self.governor.release(self.charged);
            self.charged = 0;
        }
        self.pixels = Vec::new();
        self.width = 0;
        self.height = 0;
        self.transparency = Transparency::Empty;
    }

    /// Creates a copy of the buffer charged to the same governor.
    pub fn copy(&self) -> Result<Self, ImageError> {
        let mut res = track(Self::allocate(self.width, self.height, self.governor))?;
        res.pixels.copy_from_slice(&self.pixels);
        res.transparency = self.transparency;
        Ok(res)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn transparency(&self) -> Transparency {
        self.transparency
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Amount of bytes charged to the governor by this buffer.
    #[inline]
    pub fn byte_cost(&self) -> usize {
        self.charged
    }

    #[inline]
    pub fn governor(&self) -> &'static ResourceGovernor {
        self.governor
    }

    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Mutable access to pixels.
    ///
    /// Classification of the buffer is not updated by writes through
    /// this slice, call [PixelBuffer::detect_transparent] afterwards.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Pixels as bytes in R, G, B, A order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.pixels)
    }

    #[inline]
    pub fn rows(&self) -> ChunksExact<'_, Pixel> {
        // Zero width means there are no pixels at all.
        self.pixels.chunks_exact(self.width.max(1) as usize)
    }

    #[inline]
    pub fn rows_mut(&mut self) -> ChunksExactMut<'_, Pixel> {
        self.pixels.chunks_exact_mut(self.width.max(1) as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.pixels.get(index).copied()
    }

    /// Copies the `width`x`height` region of `src` starting at `(x, y)`
    /// into the top-left corner of this buffer.
    ///
    /// The region is clipped by bounds of both buffers. Returns
    /// [ImageError::InvalidRegion] and leaves the buffer untouched
    /// if nothing is left after clipping.
    pub fn copy_from(
        &mut self,
        src: &PixelBuffer,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let src_x = x.min(src.width);
        let src_y = y.min(src.height);
        let copy_width = (x.saturating_add(width).min(src.width) - src_x).min(self.width) as usize;
        let copy_height =
            (y.saturating_add(height).min(src.height) - src_y).min(self.height) as usize;
        if copy_width == 0 || copy_height == 0 {
            return track(Err(ImageError::InvalidRegion));
        }

        let src_x = src_x as usize;
        let src_rows = src.rows().skip(src_y as usize);
        for (dst_row, src_row) in self.rows_mut().zip(src_rows).take(copy_height) {
            dst_row[..copy_width].copy_from_slice(&src_row[src_x..src_x + copy_width]);
        }
        if self.transparency == Transparency::Solid && src.transparency != Transparency::Solid {
            self.transparency = Transparency::Alpha;
        }
        Ok(())
    }

    /// Changes width of the buffer.
    ///
    /// Existing pixels are kept, new columns are transparent black.
    pub fn set_width(&mut self, width: u32) -> Result<(), ImageError> {
        track(self.set_size(width, self.height))
    }

    /// Changes height of the buffer.
    ///
    /// Existing pixels are kept, new rows are transparent black.
    pub fn set_height(&mut self, height: u32) -> Result<(), ImageError> {
        track(self.set_size(self.width, height))
    }

    fn set_size(&mut self, width: u32, height: u32) -> Result<(), ImageError> {
        if width == self.width && height == self.height {
            return Ok(());
        }
        let mut res = Self::allocate(width, height, self.governor)?;
        if res.is_empty() {
            *self = res;
            return Ok(());
        }

        let copy_width = self.width.min(width) as usize;
        let copy_height = self.height.min(height) as usize;
        if copy_width > 0 {
            for (dst_row, src_row) in res.rows_mut().zip(self.rows()).take(copy_height) {
                dst_row[..copy_width].copy_from_slice(&src_row[..copy_width]);
            }
        }
        let grown = width > self.width || height > self.height;
        if self.transparency == Transparency::Solid && !grown {
            res.transparency = Transparency::Solid;
        }
        *self = res;
        Ok(())
    }

    /// Resamples the buffer into new dimensions with the filter
    /// with the given name (`"nearest"` or `"bilinear"`).
    pub fn resize(&mut self, width: u32, height: u32, filter: &str) -> Result<(), ImageError> {
        let filter_type = track(filter.parse::<FilterType>())?;
        self.resize_with(width, height, filter_type)
    }

    /// Resamples the buffer into new dimensions.
    ///
    /// All four channels are resampled identically and independently.
    pub fn resize_with(
        &mut self,
        width: u32,
        height: u32,
        filter_type: FilterType,
    ) -> Result<(), ImageError> {
        track(self.resize_inner(width, height, filter_type))
    }

    fn resize_inner(
        &mut self,
        width: u32,
        height: u32,
        filter_type: FilterType,
    ) -> Result<(), ImageError> {
        let mut res = Self::allocate(width, height, self.governor)?;
        if !res.is_empty() && !self.is_empty() {
            resizer::resample(self, &mut res, filter_type)?;
            res.transparency = self.transparency;
        }
        *self = res;
        Ok(())
    }

    /// Composites `src` over this buffer with the top-left corner at `(x, y)`.
    ///
    /// Parts of `src` outside of this buffer are ignored.
    pub fn draw(&mut self, src: &PixelBuffer, x: i32, y: i32) {
        let Some((dst_x, src_x, width)) = clip_span(x, src.width, self.width) else {
            return;
        };
        let Some((dst_y, src_y, height)) = clip_span(y, src.height, self.height) else {
            return;
        };

        let src_rows = src.rows().skip(src_y);
        let dst_rows = self.rows_mut().skip(dst_y);
        for (dst_row, src_row) in dst_rows.zip(src_rows).take(height) {
            merge_row(
                &mut dst_row[dst_x..dst_x + width],
                &src_row[src_x..src_x + width],
            );
        }
    }

    /// Composites a single pixel over the pixel at `(x, y)`.
    pub fn draw_dot(&mut self, x: i32, y: i32, color: Pixel) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        if let Some(pixel) = self.pixels.get_mut(index) {
            pixel.merge(color);
        }
    }

    /// Sets all pixels to `color`.
    pub fn fill(&mut self, color: Pixel) {
        if self.is_empty() {
            return;
        }
        self.pixels.fill(color);
        self.transparency = Transparency::for_alpha(color.a);
    }

    /// Scans pixels and updates classification of the buffer.
    pub fn detect_transparent(&mut self) -> Transparency {
        self.transparency = if self.is_empty() {
            Transparency::Empty
        } else if self.pixels.iter().all(Pixel::is_opaque) {
            Transparency::Solid
        } else {
            Transparency::Alpha
        };
        self.transparency
    }
}

impl Drop for PixelBuffer {
    fn drop(&mut self) {
        self.free();
    }
}

fn alloc_pixels(pixels_count: usize) -> Result<Vec<Pixel>, ImageError> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(pixels_count)
        .map_err(|_| ImageError::AllocationFailure(pixels_count.saturating_mul(size_of::<Pixel>())))?;
    pixels.resize(pixels_count, Pixel::TRANSPARENT);
    Ok(pixels)
}

/// Clips a span of `src_size` pixels placed at `offset` by `[0, dst_size)`.
///
/// Returns start in destination, start in source and length of the span.
fn clip_span(offset: i32, src_size: u32, dst_size: u32) -> Option<(usize, usize, usize)> {
    let offset = offset as i64;
    let dst_start = offset.max(0);
    let dst_end = (offset + src_size as i64).min(dst_size as i64);
    if dst_start >= dst_end {
        return None;
    }
    let src_start = dst_start - offset;
    Some((
        dst_start as usize,
        src_start as usize,
        (dst_end - dst_start) as usize,
    ))
}
