use raster_core::testing::{clear_log, logs_contain};
use raster_core::{FilterType, ImageError, Pixel, PixelBuffer, ResourceGovernor, Transparency};
use utils::{checker, image_checksum, solid};

mod utils;

static GOVERNOR: ResourceGovernor = ResourceGovernor::new();

fn row_of(values: &[u8]) -> PixelBuffer {
    let mut image = PixelBuffer::with_governor(values.len() as u32, 1, &GOVERNOR).unwrap();
    for (pixel, &v) in image.pixels_mut().iter_mut().zip(values) {
        *pixel = Pixel::new(v, v, v, 255);
    }
    image.detect_transparent();
    image
}

fn red_channel(image: &PixelBuffer) -> Vec<u8> {
    image.pixels().iter().map(|p| p.r).collect()
}

#[test]
fn nearest_upscale_duplicates_pixels() {
    let mut image = row_of(&[10, 20, 30]);
    image.resize(6, 2, "nearest").unwrap();
    assert_eq!((image.width(), image.height()), (6, 2));
    assert_eq!(red_channel(&image), [10, 10, 20, 20, 30, 30, 10, 10, 20, 20, 30, 30]);
}

#[test]
fn nearest_downscale_picks_centers() {
    let mut image = row_of(&[0, 1, 2, 3, 4, 5, 6, 7]);
    image.resize(4, 1, "nearest").unwrap();
    assert_eq!(red_channel(&image), [1, 3, 5, 7]);
    image.resize(1, 1, "Nearest").unwrap();
    assert_eq!(red_channel(&image), [5]);
}

#[test]
fn bilinear_upscale_interpolates() {
    let mut image = row_of(&[0, 255]);
    image.resize(4, 1, "bilinear").unwrap();
    assert_eq!(red_channel(&image), [0, 64, 191, 255]);
    assert!(image.pixels().iter().all(|p| p.a == 255));
}

#[test]
fn bilinear_downscale_averages() {
    let mut image = row_of(&[0, 0, 255, 255]);
    image.resize(2, 1, "bilinear").unwrap();
    let values = red_channel(&image);
    assert!(values[0] < 64, "{values:?}");
    assert!(values[1] > 191, "{values:?}");
}

#[test]
fn uniform_image_stays_uniform() {
    let color = Pixel::new(37, 150, 201, 99);
    let sizes = [(1, 1), (3, 7), (10, 10), (17, 5), (64, 3), (2, 40)];
    for filter in [FilterType::Nearest, FilterType::Bilinear] {
        for &(src_w, src_h) in &sizes {
            for &(dst_w, dst_h) in &sizes {
                let mut image = solid(src_w, src_h, color, &GOVERNOR);
                image.resize_with(dst_w, dst_h, filter).unwrap();
                assert_eq!((image.width(), image.height()), (dst_w, dst_h));
                assert!(
                    image.pixels().iter().all(|&p| p == color),
                    "{filter}: {src_w}x{src_h} -> {dst_w}x{dst_h}"
                );
            }
        }
    }
}

#[test]
fn same_size_is_copy() {
    let src = checker(9, 4, &GOVERNOR);
    for filter in ["nearest", "bilinear"] {
        let mut image = src.copy().unwrap();
        image.resize(9, 4, filter).unwrap();
        assert_eq!(image.pixels(), src.pixels());
        assert_eq!(image_checksum(&image), image_checksum(&src));
    }
}

#[test]
fn passes_are_skipped_for_unchanged_dimension() {
    let src = checker(9, 4, &GOVERNOR);

    clear_log();
    let mut image = src.copy().unwrap();
    image.resize(5, 4, "bilinear").unwrap();
    assert!(logs_contain("compute horizontal convolution coefficients"));
    assert!(!logs_contain("compute vertical convolution coefficients"));

    clear_log();
    let mut image = src.copy().unwrap();
    image.resize(9, 2, "bilinear").unwrap();
    assert!(!logs_contain("compute horizontal convolution coefficients"));
    assert!(logs_contain("compute vertical convolution coefficients"));

    clear_log();
    let mut image = src.copy().unwrap();
    image.resize(9, 4, "bilinear").unwrap();
    assert!(logs_contain("copy pixels without resampling"));
}

#[test]
fn two_pass_matches_separate_passes() {
    let src = checker(13, 11, &GOVERNOR);

    let mut both = src.copy().unwrap();
    both.resize(7, 5, "bilinear").unwrap();

    let mut separate = src.copy().unwrap();
    separate.resize(7, 11, "bilinear").unwrap();
    separate.resize(7, 5, "bilinear").unwrap();

    assert_eq!(both.pixels(), separate.pixels());
}

#[test]
fn zero_target_gives_empty_buffer() {
    let mut image = checker(5, 5, &GOVERNOR);
    image.resize(0, 3, "bilinear").unwrap();
    assert!(image.is_empty());
    assert_eq!(image.transparency(), Transparency::Empty);
    assert_eq!((image.width(), image.height()), (0, 3));
}

#[test]
fn empty_source_gives_transparent_buffer() {
    let mut image = PixelBuffer::empty_with_governor(&GOVERNOR);
    image.resize(3, 2, "nearest").unwrap();
    assert_eq!((image.width(), image.height()), (3, 2));
    assert!(image.pixels().iter().all(|&p| p == Pixel::TRANSPARENT));
}

#[test]
fn classification_is_kept() {
    let mut image = solid(4, 4, Pixel::rgb(1, 2, 3), &GOVERNOR);
    image.resize(9, 2, "bilinear").unwrap();
    assert_eq!(image.transparency(), Transparency::Solid);
    assert!(image.pixels().iter().all(|p| p.a == 255));

    let mut image = checker(4, 4, &GOVERNOR);
    image.resize(2, 8, "nearest").unwrap();
    assert_eq!(image.transparency(), Transparency::Alpha);
}

#[test]
fn invalid_filter_leaves_image_unchanged() {
    let src = checker(4, 3, &GOVERNOR);
    let mut image = src.copy().unwrap();
    assert_eq!(
        image.resize(8, 8, "bicubic"),
        Err(ImageError::InvalidFilter("bicubic".to_string()))
    );
    assert_eq!((image.width(), image.height()), (4, 3));
    assert_eq!(image.pixels(), src.pixels());
}

#[test]
fn memory_of_old_pixels_is_released() {
    static LOCAL: ResourceGovernor = ResourceGovernor::new();
    let mut image = solid(10, 10, Pixel::WHITE, &LOCAL);
    image.resize(3, 4, "bilinear").unwrap();
    assert_eq!(
        LOCAL.used_memory(),
        ResourceGovernor::buffer_cost(3, 4).unwrap()
    );
}

#[test]
fn nearest_there_and_back_keeps_uniform_color() {
    let color = Pixel::new(3, 140, 250, 17);
    let mut image = solid(13, 7, color, &GOVERNOR);
    image.resize(40, 3, "nearest").unwrap();
    image.resize(13, 7, "nearest").unwrap();
    assert_eq!((image.width(), image.height()), (13, 7));
    assert!(image.pixels().iter().all(|&p| p == color));
}
