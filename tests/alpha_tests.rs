use raster_core::{merge, Pixel, PixelBuffer, ResourceGovernor, Transparency};
use utils::{checker, solid};

mod utils;

static GOVERNOR: ResourceGovernor = ResourceGovernor::new();

const fn p(r: u8, g: u8, b: u8, a: u8) -> Pixel {
    Pixel::new(r, g, b, a)
}

#[test]
fn known_values() {
    let cases = [
        // (base, overlay, result)
        (p(0, 0, 255, 255), p(255, 0, 0, 128), p(128, 0, 127, 255)),
        (p(0, 0, 0, 0), p(255, 0, 0, 128), p(255, 0, 0, 128)),
        (p(0, 0, 255, 128), p(255, 0, 0, 128), p(170, 0, 85, 191)),
        (p(10, 20, 30, 40), p(1, 2, 3, 255), p(1, 2, 3, 255)),
        (p(10, 20, 30, 40), p(1, 2, 3, 0), p(10, 20, 30, 40)),
    ];
    for (base, overlay, result) in cases {
        assert_eq!(merge(base, overlay), result, "{base:?} + {overlay:?}");
    }
}

#[test]
fn opaque_base_stays_opaque() {
    for overlay_a in 0..=255u8 {
        let res = merge(p(10, 200, 30, 255), p(250, 5, 128, overlay_a));
        assert_eq!(res.a, 255, "overlay alpha {overlay_a}");
    }
}

#[test]
fn alpha_never_decreases_below_overlay() {
    for overlay_a in (0..=255u8).step_by(5) {
        for base_a in (0..=255u8).step_by(5) {
            let res = merge(p(255, 255, 255, base_a), p(255, 255, 255, overlay_a));
            assert!(res.a >= overlay_a, "{base_a} {overlay_a}");
            // White over white stays white.
            if res.a > 0 {
                assert!(res.r >= 254 && res.g >= 254 && res.b >= 254, "{res:?}");
            }
        }
    }
}

#[test]
fn same_color_over_opaque_is_unchanged() {
    for c in (0..=255u8).step_by(15) {
        for overlay_a in 0..=255u8 {
            let color = p(c, 255 - c, c / 2, 255);
            let res = merge(color, p(color.r, color.g, color.b, overlay_a));
            assert_eq!(res, color);
        }
    }
}

#[test]
fn draw_equals_per_pixel_merge() {
    let base = checker(7, 6, &GOVERNOR);
    let mut overlay = checker(5, 4, &GOVERNOR);
    overlay.pixels_mut().reverse();
    overlay.detect_transparent();

    let mut dst = base.copy().unwrap();
    dst.draw(&overlay, 1, 2);

    for y in 0u32..6 {
        for x in 0u32..7 {
            let expected = match (x.checked_sub(1), y.checked_sub(2)) {
                (Some(ox), Some(oy)) if ox < 5 && oy < 4 => {
                    merge(base.pixel(x, y).unwrap(), overlay.pixel(ox, oy).unwrap())
                }
                _ => base.pixel(x, y).unwrap(),
            };
            assert_eq!(dst.pixel(x, y), Some(expected), "({x}, {y})");
        }
    }
}

#[test]
fn draw_keeps_classification() {
    let overlay = checker(3, 3, &GOVERNOR);

    let mut dst = solid(4, 4, Pixel::BLACK, &GOVERNOR);
    dst.draw(&overlay, 0, 0);
    assert_eq!(dst.transparency(), Transparency::Solid);
    assert!(dst.pixels().iter().all(|p| p.a == 255));

    let mut dst = PixelBuffer::with_governor(4, 4, &GOVERNOR).unwrap();
    dst.draw(&overlay, 0, 0);
    assert_eq!(dst.transparency(), Transparency::Alpha);
}
