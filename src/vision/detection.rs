//! Glyph detection
//!
//! Locates glyph templates in a color-isolated image using zero-mean
//! normalized cross-correlation, and orders the pooled detections into
//! reading order.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::integral_image::{integral_image, integral_squared_image};
use std::time::Instant;
use tracing::{debug, trace};

use super::font::Font;

/// Minimum correlation for a glyph to count as present.
///
/// Glyph bitmaps are pixel-exact renders, so true matches score ~1.0 and
/// anything below this is a different (often visually similar) glyph.
pub const MATCH_THRESHOLD: f32 = 0.98;

type IntegralImage = ImageBuffer<Luma<u64>, Vec<u64>>;

/// One located glyph: its character and top-left corner in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Detection {
    pub ch: char,
    pub x: u32,
    pub y: u32,
}

/// Template matcher bound to one search image.
///
/// Window sums are read from integral images built once per image, so
/// matching many glyphs against the same region only pays for the
/// cross term per glyph.
pub struct GlyphMatcher<'a> {
    image: &'a GrayImage,
    sum: IntegralImage,
    sum_sq: IntegralImage,
}

impl<'a> GlyphMatcher<'a> {
    pub fn new(image: &'a GrayImage) -> Self {
        Self {
            image,
            sum: integral_image::<_, u64>(image),
            sum_sq: integral_squared_image::<_, u64>(image),
        }
    }

    /// Top-left corners of every position where `template` correlates at or
    /// above [`MATCH_THRESHOLD`], in row-major order.
    ///
    /// A template larger than the image in either dimension yields nothing.
    pub fn locate(&self, template: &GrayImage) -> Vec<(u32, u32)> {
        let (img_w, img_h) = self.image.dimensions();
        let (tmpl_w, tmpl_h) = template.dimensions();

        if tmpl_w == 0 || tmpl_h == 0 || tmpl_w > img_w || tmpl_h > img_h {
            debug!(
                "Skipping {}x{} template against {}x{} image",
                tmpl_w, tmpl_h, img_w, img_h
            );
            return vec![];
        }

        let Some(stats) = TemplateStats::new(template) else {
            // A flat template has no variance to correlate against
            return vec![];
        };

        let mut positions = Vec::new();
        for y in 0..=(img_h - tmpl_h) {
            for x in 0..=(img_w - tmpl_w) {
                if self.score_at(template, &stats, x, y) >= MATCH_THRESHOLD {
                    positions.push((x, y));
                }
            }
        }

        positions
    }

    /// Correlation of `template` with the window whose top-left is (x, y)
    fn score_at(&self, template: &GrayImage, stats: &TemplateStats, x: u32, y: u32) -> f32 {
        let (tmpl_w, tmpl_h) = template.dimensions();

        let sum_i = window_sum(&self.sum, x, y, tmpl_w, tmpl_h) as f64;
        let sum_i2 = window_sum(&self.sum_sq, x, y, tmpl_w, tmpl_h) as f64;

        let var_i = sum_i2 - sum_i * sum_i / stats.count;
        if var_i < 1e-10 {
            return 0.0;
        }

        let mut sum_it = 0u64;
        for (tx, ty, pixel) in template.enumerate_pixels() {
            let img_val = self.image.get_pixel(x + tx, y + ty).0[0] as u64;
            sum_it += img_val * pixel.0[0] as u64;
        }

        let numerator = sum_it as f64 - sum_i * stats.mean;
        let denominator = var_i.sqrt() * stats.deviation;

        (numerator / denominator).clamp(0.0, 1.0) as f32
    }
}

/// Per-template terms of the correlation
struct TemplateStats {
    count: f64,
    mean: f64,
    /// sqrt of the summed squared deviation from the mean
    deviation: f64,
}

impl TemplateStats {
    fn new(template: &GrayImage) -> Option<Self> {
        let count = template.as_raw().len() as f64;
        let (sum, sum_sq) = template.as_raw().iter().fold((0.0f64, 0.0f64), |(s, s2), &v| {
            let v = v as f64;
            (s + v, s2 + v * v)
        });

        let variance = sum_sq - sum * sum / count;
        if variance < 1e-10 {
            return None;
        }

        Some(Self {
            count,
            mean: sum / count,
            deviation: variance.sqrt(),
        })
    }
}

/// Sum of the w x h window at (x, y); integral images carry a leading zero
/// row and column.
fn window_sum(integral: &IntegralImage, x: u32, y: u32, w: u32, h: u32) -> u64 {
    let at = |px: u32, py: u32| integral.get_pixel(px, py).0[0];
    at(x + w, y + h) + at(x, y) - at(x + w, y) - at(x, y + h)
}

/// Positions of `template` in `image`; see [`GlyphMatcher::locate`]
pub fn locate(image: &GrayImage, template: &GrayImage) -> Vec<(u32, u32)> {
    GlyphMatcher::new(image).locate(template)
}

/// Run the matcher for each of `chars` that `font` has a glyph for and pool
/// the results. Order is unspecified until passed through
/// [`order_detections`].
pub fn detect_glyphs(
    image: &GrayImage,
    font: &Font,
    chars: impl IntoIterator<Item = char>,
) -> Vec<Detection> {
    let start = Instant::now();
    let matcher = GlyphMatcher::new(image);

    let mut detections = Vec::new();
    for ch in chars {
        let Some(template) = font.glyph(ch) else {
            continue;
        };
        let found = matcher.locate(template);
        if !found.is_empty() {
            trace!("Glyph {:?}: {} match(es)", ch, found.len());
        }
        detections.extend(found.into_iter().map(|(x, y)| Detection { ch, x, y }));
    }

    debug!(
        "Glyph detection on {}x{} image with font '{}' complete in {:?}: {} detections",
        image.width(),
        image.height(),
        font.name(),
        start.elapsed(),
        detections.len()
    );

    detections
}

/// Sort into reading order: top row first, then left to right.
///
/// The sort is stable and keyed on (y, x) only, so lines whose vertical
/// extents overlap can interleave.
pub fn order_detections(detections: &mut [Detection]) {
    detections.sort_by_key(|d| (d.y, d.x));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::testing::{gray_canvas, pattern_glyph, stamp_gray};

    #[test]
    fn test_locate_single_occurrence() {
        let glyph = pattern_glyph(1, 10, 14);
        let mut image = gray_canvas(40, 30);
        stamp_gray(&mut image, &glyph, 7, 9);

        assert_eq!(locate(&image, &glyph), vec![(7, 9)]);
    }

    #[test]
    fn test_locate_repeated_glyph() {
        let glyph = pattern_glyph(2, 10, 14);
        let mut image = gray_canvas(60, 40);
        stamp_gray(&mut image, &glyph, 30, 20);
        stamp_gray(&mut image, &glyph, 3, 2);

        // Row-major scan order
        assert_eq!(locate(&image, &glyph), vec![(3, 2), (30, 20)]);
    }

    #[test]
    fn test_locate_rejects_other_glyph() {
        let a = pattern_glyph(3, 10, 14);
        let b = pattern_glyph(4, 10, 14);
        let mut image = gray_canvas(40, 30);
        stamp_gray(&mut image, &a, 5, 5);

        assert!(locate(&image, &b).is_empty());
    }

    #[test]
    fn test_locate_template_larger_than_image() {
        let glyph = pattern_glyph(5, 10, 14);
        let image = gray_canvas(8, 20);
        assert!(locate(&image, &glyph).is_empty());

        let image = gray_canvas(20, 13);
        assert!(locate(&image, &glyph).is_empty());
    }

    #[test]
    fn test_locate_template_same_size_as_image() {
        let glyph = pattern_glyph(6, 10, 14);
        assert_eq!(locate(&glyph, &glyph), vec![(0, 0)]);
    }

    #[test]
    fn test_locate_flat_inputs() {
        let flat = GrayImage::from_pixel(4, 4, Luma([255]));
        let image = gray_canvas(20, 20);
        assert!(locate(&image, &flat).is_empty());

        // Blank image has no variance anywhere
        let glyph = pattern_glyph(7, 4, 4);
        assert!(locate(&image, &glyph).is_empty());
    }

    #[test]
    fn test_score_perfect_match() {
        let glyph = pattern_glyph(8, 10, 14);
        let mut image = gray_canvas(30, 30);
        stamp_gray(&mut image, &glyph, 10, 10);

        let matcher = GlyphMatcher::new(&image);
        let stats = TemplateStats::new(&glyph).unwrap();
        let score = matcher.score_at(&glyph, &stats, 10, 10);
        assert!(score > 0.999, "Perfect match should score ~1.0: {}", score);

        let off = matcher.score_at(&glyph, &stats, 11, 10);
        assert!(off < MATCH_THRESHOLD, "Shifted window scored {}", off);
    }

    #[test]
    fn test_window_sum() {
        let image = GrayImage::from_raw(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let sum = integral_image::<_, u64>(&image);

        assert_eq!(window_sum(&sum, 0, 0, 3, 2), 21);
        assert_eq!(window_sum(&sum, 1, 0, 2, 2), 16);
        assert_eq!(window_sum(&sum, 2, 1, 1, 1), 6);
    }

    #[test]
    fn test_detect_glyphs_skips_unknown_chars() {
        let a = pattern_glyph(9, 10, 14);
        let font = Font::from_glyphs("test", [('A', a.clone())]);
        let mut image = gray_canvas(40, 30);
        stamp_gray(&mut image, &a, 4, 6);

        let detections = detect_glyphs(&image, &font, ['A', 'Q']);
        assert_eq!(detections, vec![Detection { ch: 'A', x: 4, y: 6 }]);
    }

    #[test]
    fn test_order_detections_reading_order() {
        let mut detections = vec![
            Detection { ch: 'c', x: 0, y: 20 },
            Detection { ch: 'b', x: 20, y: 0 },
            Detection { ch: 'a', x: 0, y: 0 },
        ];
        order_detections(&mut detections);

        let text: String = detections.iter().map(|d| d.ch).collect();
        assert_eq!(text, "abc");
    }

    #[test]
    fn test_order_detections_is_stable_for_duplicates() {
        let mut detections = vec![
            Detection { ch: 'l', x: 5, y: 5 },
            Detection { ch: 'I', x: 5, y: 5 },
        ];
        order_detections(&mut detections);
        assert_eq!(detections[0].ch, 'l');
        assert_eq!(detections[1].ch, 'I');
    }
}
