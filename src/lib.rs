//! glyph-ocr - bitmap-font text recognition by glyph template matching
//!
//! Reads text rendered in a known pixel font out of a screen region, or finds
//! where given strings appear in it, without a general-purpose OCR engine.

pub mod capture;
pub mod config;
pub mod geometry;
pub mod vision;

pub use capture::CapturedFrame;
pub use geometry::Rectangle;
pub use vision::{extract_text, find_text, Color, Font, FontRegistry, FontStyle, SearchTargets};
