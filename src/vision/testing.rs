//! Synthetic glyphs and canvases for tests

use image::{GrayImage, Luma, Rgb, RgbImage};

/// Deterministic binary glyph: a pseudo-random on/off pattern per seed,
/// white on black like a rendered font bitmap.
pub fn pattern_glyph(seed: u32, width: u32, height: u32) -> GrayImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    let mut glyph = GrayImage::from_fn(width, height, |_, _| {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        Luma([if (state >> 16) & 1 == 1 { 255 } else { 0 }])
    });

    // Never flat
    glyph.put_pixel(0, 0, Luma([255]));
    glyph.put_pixel(width - 1, height - 1, Luma([0]));
    glyph
}

pub fn gray_canvas(width: u32, height: u32) -> GrayImage {
    GrayImage::new(width, height)
}

/// Copy `glyph` into `image` with its top-left at (x, y)
pub fn stamp_gray(image: &mut GrayImage, glyph: &GrayImage, x: u32, y: u32) {
    for (gx, gy, pixel) in glyph.enumerate_pixels() {
        image.put_pixel(x + gx, y + gy, *pixel);
    }
}

/// Paint the lit pixels of `glyph` into `image` in `color`
pub fn stamp_rgb(image: &mut RgbImage, glyph: &GrayImage, x: u32, y: u32, color: Rgb<u8>) {
    for (gx, gy, pixel) in glyph.enumerate_pixels() {
        if pixel.0[0] > 0 {
            image.put_pixel(x + gx, y + gy, color);
        }
    }
}
