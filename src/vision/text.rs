//! Text reconstruction
//!
//! Turns pooled glyph detections into text: either the full string read from
//! a region, or the bounding boxes of exact target strings.

use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, warn};

use super::color::{isolate_colors, Color};
use super::detection::{detect_glyphs, order_detections, Detection};
use super::font::Font;
use crate::capture::CapturedFrame;
use crate::geometry::Rectangle;

/// Strings to search for. Results never say which target a box belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTargets {
    Single(String),
    List(Vec<String>),
}

impl SearchTargets {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            SearchTargets::Single(target) => vec![target],
            SearchTargets::List(targets) => targets,
        }
    }
}

impl From<&str> for SearchTargets {
    fn from(target: &str) -> Self {
        SearchTargets::Single(target.to_string())
    }
}

impl From<String> for SearchTargets {
    fn from(target: String) -> Self {
        SearchTargets::Single(target)
    }
}

impl From<Vec<String>> for SearchTargets {
    fn from(targets: Vec<String>) -> Self {
        SearchTargets::List(targets)
    }
}

impl From<&[&str]> for SearchTargets {
    fn from(targets: &[&str]) -> Self {
        SearchTargets::List(targets.iter().map(|t| t.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SearchTargets {
    fn from(targets: [&str; N]) -> Self {
        SearchTargets::List(targets.iter().map(|t| t.to_string()).collect())
    }
}

/// Read every glyph of `font` in the region, in reading order, as one string
/// without separators.
///
/// Characters in `exclude_chars` are not matched. Returns an empty string when
/// nothing matches.
pub fn extract_text(
    frame: &CapturedFrame,
    font: &Font,
    colors: &[Color],
    exclude_chars: &str,
) -> String {
    let image = isolate_colors(&frame.image, colors);

    let chars = font
        .chars()
        .filter(|&ch| ch != ' ' && !exclude_chars.contains(ch));
    let mut detections = detect_glyphs(&image, font, chars);
    order_detections(&mut detections);

    let text: String = detections.iter().map(|d| d.ch).collect();
    debug!("Extracted {:?} from region {}", text, frame.bounds);
    text
}

/// Locate exact (case-sensitive) occurrences of the targets in the region.
///
/// Spaces in targets are ignored. Characters the font has no glyph for are
/// dropped from the targets with a warning, and the reduced text is searched.
/// Every match is reported, including overlapping ones; boxes are in the
/// region's absolute coordinates.
pub fn find_text(
    targets: impl Into<SearchTargets>,
    frame: &CapturedFrame,
    font: &Font,
    colors: &[Color],
) -> Vec<Rectangle> {
    let start = Instant::now();
    let (targets, chars) = prepare_targets(targets.into().into_vec(), font);
    if chars.is_empty() {
        return vec![];
    }

    let image = isolate_colors(&frame.image, colors);
    let mut detections = detect_glyphs(&image, font, chars);
    order_detections(&mut detections);
    let haystack: Vec<char> = detections.iter().map(|d| d.ch).collect();

    let mut found = Vec::new();
    for target in &targets {
        if target.is_empty() || target.len() > haystack.len() {
            continue;
        }

        for (index, window) in haystack.windows(target.len()).enumerate() {
            if window != target.as_slice() {
                continue;
            }
            let span = &detections[index..index + target.len()];
            if let Some(rect) = span_bounds(span, font) {
                found.push(rect.offset(frame.bounds.left, frame.bounds.top));
            }
        }
    }

    debug!(
        "Text search in region {} complete in {:?}: {} match(es)",
        frame.bounds,
        start.elapsed(),
        found.len()
    );

    found
}

/// Strip spaces and unsupported characters from every target, and collect the
/// distinct characters left to match.
fn prepare_targets(targets: Vec<String>, font: &Font) -> (Vec<Vec<char>>, BTreeSet<char>) {
    let requested: BTreeSet<char> = targets
        .iter()
        .flat_map(|t| t.chars())
        .filter(|&ch| ch != ' ')
        .collect();

    let (supported, missing): (BTreeSet<char>, BTreeSet<char>) =
        requested.into_iter().partition(|&ch| font.contains(ch));

    for ch in &missing {
        warn!(
            "Font '{}' does not contain character {:?}. Omitting from search.",
            font.name(),
            ch
        );
    }

    let targets = targets
        .iter()
        .map(|t| t.chars().filter(|ch| supported.contains(ch)).collect())
        .collect();

    (targets, supported)
}

/// Image-local box from the first glyph's corner to the far edge of the last
/// glyph. Height is the last glyph's template height.
fn span_bounds(span: &[Detection], font: &Font) -> Option<Rectangle> {
    let first = span.first()?;
    let last = span.last()?;
    let glyph = font.glyph(last.ch)?;

    // Spans that wrap onto a lower line can end left of where they start
    let width = (last.x as i64 - first.x as i64 + glyph.width() as i64).max(0) as u32;

    Some(Rectangle::new(
        first.x as i32,
        first.y as i32,
        width,
        glyph.height(),
    ))
}
