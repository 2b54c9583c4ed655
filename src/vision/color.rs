//! Color isolation
//!
//! Reduces a captured frame to a binary intensity image that keeps only the
//! pixels of the requested text colors. Glyph templates are rendered the same
//! way (white glyph on black), so matching runs on comparable images.

use image::{GrayImage, Luma, Rgb, RgbImage};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Intensity written for isolated pixels
const FOREGROUND: u8 = 255;

/// Inclusive RGB range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl Color {
    pub const BLACK: Color = Color::exact(0, 0, 0);
    pub const WHITE: Color = Color::exact(255, 255, 255);
    pub const OFF_WHITE: Color = Color::range([190, 190, 190], [215, 215, 215]);
    pub const RED: Color = Color::exact(255, 0, 0);
    pub const GREEN: Color = Color::exact(0, 255, 0);
    pub const BLUE: Color = Color::exact(0, 0, 255);
    pub const CYAN: Color = Color::exact(0, 255, 255);
    pub const YELLOW: Color = Color::exact(255, 255, 0);
    pub const ORANGE: Color = Color::exact(255, 144, 64);

    /// A single RGB value
    pub const fn exact(r: u8, g: u8, b: u8) -> Self {
        Self {
            lower: [r, g, b],
            upper: [r, g, b],
        }
    }

    /// Every RGB value between `lower` and `upper`, per channel, inclusive
    pub const fn range(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// Look up a palette color by name (case-insensitive, `-` or `_` separated)
    pub fn named(name: &str) -> Option<Self> {
        let key = name.trim().to_ascii_lowercase().replace('-', "_");
        let color = match key.as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "off_white" => Self::OFF_WHITE,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "cyan" => Self::CYAN,
            "yellow" => Self::YELLOW,
            "orange" => Self::ORANGE,
            _ => return None,
        };
        Some(color)
    }

    pub fn contains(&self, pixel: &Rgb<u8>) -> bool {
        pixel
            .0
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(&c, (&lo, &hi))| c >= lo && c <= hi)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.lower;
        if self.lower == self.upper {
            write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            let [r2, g2, b2] = self.upper;
            write!(f, "#{:02x}{:02x}{:02x}..#{:02x}{:02x}{:02x}", r, g, b, r2, g2, b2)
        }
    }
}

/// Error parsing a color name or hex code
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("unknown color '{0}' (expected a palette name or #rrggbb)")]
    Unknown(String),
    #[error("invalid hex color '{0}'")]
    InvalidHex(String),
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(hex) = s.trim().strip_prefix('#') else {
            return Self::named(s).ok_or_else(|| ColorParseError::Unknown(s.to_string()));
        };

        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorParseError::InvalidHex(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ColorParseError::InvalidHex(s.to_string()))
        };

        Ok(Self::exact(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Keep only the pixels matching any of `colors`.
///
/// Matching pixels become 255, everything else 0.
pub fn isolate_colors(image: &RgbImage, colors: &[Color]) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut mask = GrayImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        if colors.iter().any(|c| c.contains(pixel)) {
            mask.put_pixel(x, y, Luma([FOREGROUND]));
        }
    }

    debug!(
        "Isolated {} color(s) in {}x{} image",
        colors.len(),
        width,
        height
    );

    mask
}
