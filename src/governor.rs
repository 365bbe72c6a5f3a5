use std::mem::size_of;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use log::debug;

use crate::pixels::Pixel;
use crate::ImageError;

static GLOBAL_GOVERNOR: ResourceGovernor = ResourceGovernor::new();

/// Size limits and memory accounting for pixel buffers.
///
/// Every [PixelBuffer](crate::PixelBuffer) is bound to a governor. The buffer
/// checks the limits of its governor before allocating pixels, charges
/// the governor for the allocated memory and returns exactly the same amount
/// when it is freed or dropped.
///
/// Buffers created by [PixelBuffer::new](crate::PixelBuffer::new) use
/// the [global](ResourceGovernor::global) governor. An independent governor
/// may be declared as a `static`:
///
/// ```
/// use raster_core::{PixelBuffer, ResourceGovernor};
///
/// static GOVERNOR: ResourceGovernor = ResourceGovernor::new();
///
/// let image = PixelBuffer::with_governor(10, 7, &GOVERNOR).unwrap();
/// assert_eq!(GOVERNOR.used_memory(), image.byte_cost());
/// drop(image);
/// assert_eq!(GOVERNOR.used_memory(), 0);
/// ```
#[derive(Debug)]
pub struct ResourceGovernor {
    max_width: AtomicU32,
    max_height: AtomicU32,
    used_memory: AtomicUsize,
}

impl Default for ResourceGovernor {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceGovernor {
    /// Creates a governor without size limits.
    pub const fn new() -> Self {
        Self {
            max_width: AtomicU32::new(u32::MAX),
            max_height: AtomicU32::new(u32::MAX),
            used_memory: AtomicUsize::new(0),
        }
    }

    /// Process-wide governor.
    #[inline]
    pub fn global() -> &'static Self {
        &GLOBAL_GOVERNOR
    }

    #[inline]
    pub fn max_width(&self) -> u32 {
        self.max_width.load(Ordering::Relaxed)
    }

    pub fn set_max_width(&self, max_width: u32) {
        debug!("Set max width of images to {max_width}");
        self.max_width.store(max_width, Ordering::Relaxed);
    }

    #[inline]
    pub fn max_height(&self) -> u32 {
        self.max_height.load(Ordering::Relaxed)
    }

    pub fn set_max_height(&self, max_height: u32) {
        debug!("Set max height of images to {max_height}");
        self.max_height.store(max_height, Ordering::Relaxed);
    }

    /// Total amount of bytes charged by all alive buffers.
    #[inline]
    pub fn used_memory(&self) -> usize {
        self.used_memory.load(Ordering::Acquire)
    }

    /// Checks the given dimensions against the size limits.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<(), ImageError> {
        let max_width = self.max_width();
        let max_height = self.max_height();
        if width > max_width || height > max_height {
            return Err(ImageError::SizeLimitExceeded {
                width,
                height,
                max_width,
                max_height,
            });
        }
        Ok(())
    }

    /// Returns the amount of bytes charged for a buffer with given dimensions.
    ///
    /// A buffer pays for indexing of its rows (one pointer-sized unit per row)
    /// and for the pixels themselves. Zero-area buffers have no storage
    /// and cost nothing.
    pub fn buffer_cost(width: u32, height: u32) -> Result<usize, ImageError> {
        if width == 0 || height == 0 {
            return Ok(0);
        }
        let overflow = || ImageError::AllocationFailure(usize::MAX);
        let rows_cost = (height as usize)
            .checked_mul(size_of::<usize>())
            .ok_or_else(overflow)?;
        let pixels_cost = (width as usize)
            .checked_mul(height as usize)
            .and_then(|count| count.checked_mul(size_of::<Pixel>()))
            .ok_or_else(overflow)?;
        rows_cost.checked_add(pixels_cost).ok_or_else(overflow)
    }

    /// Forces any pending bookkeeping of freed buffers and returns
    /// the amount of used memory.
    ///
    /// Buffers return their memory as soon as they are freed or dropped,
    /// so this call doesn't change anything observable. It exists for
    /// host environments which expect an explicit reclamation trigger.
    pub fn reclaim(&self) -> usize {
        let used = self.used_memory();
        debug!("Reclaim requested, {used} bytes are in use");
        used
    }

    #[inline]
    pub(crate) fn charge(&self, bytes: usize) {
        self.used_memory.fetch_add(bytes, Ordering::AcqRel);
    }

    #[inline]
    pub(crate) fn release(&self, bytes: usize) {
        let _ = self
            .used_memory
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                Some(used.saturating_sub(bytes))
            });
    }
}
