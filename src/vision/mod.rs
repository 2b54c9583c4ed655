//! Vision Layer
//!
//! Bitmap-font text recognition on captured frames. A color filter reduces
//! the frame to glyph pixels, every relevant glyph template is correlated
//! against it, and the pooled detections are read back as text or as the
//! bounding boxes of searched strings.

pub mod color;
pub mod detection;
pub mod font;
pub mod text;

#[cfg(test)]
pub(crate) mod testing;

pub use color::{isolate_colors, Color, ColorParseError};
pub use detection::{
    detect_glyphs, locate, order_detections, Detection, GlyphMatcher, MATCH_THRESHOLD,
};
pub use font::{Font, FontError, FontRegistry, FontStyle};
pub use text::{extract_text, find_text, SearchTargets};
