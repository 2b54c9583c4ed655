//! Screen geometry
//!
//! Axis-aligned rectangles in absolute screen/image coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Axis-aligned rectangle (left, top, width, height)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.left + self.width as i32
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.top + self.height as i32
    }

    /// Same size, shifted by (dx, dy)
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }

    /// Get the center point of the rectangle
    pub fn center(&self) -> (i32, i32) {
        (
            self.left + (self.width / 2) as i32,
            self.top + (self.height / 2) as i32,
        )
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.width, self.height
        )
    }
}

/// Error parsing a `left,top,width,height` string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RectangleParseError {
    #[error("expected 4 comma-separated values (left,top,width,height), got {0}")]
    WrongArity(usize),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

impl FromStr for Rectangle {
    type Err = RectangleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(RectangleParseError::WrongArity(parts.len()));
        }

        let signed = |p: &str| {
            p.parse::<i32>()
                .map_err(|_| RectangleParseError::InvalidNumber(p.to_string()))
        };
        let unsigned = |p: &str| {
            p.parse::<u32>()
                .map_err(|_| RectangleParseError::InvalidNumber(p.to_string()))
        };

        Ok(Self::new(
            signed(parts[0])?,
            signed(parts[1])?,
            unsigned(parts[2])?,
            unsigned(parts[3])?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_center() {
        let rect = Rectangle::new(10, 20, 30, 40);
        assert_eq!(rect.right(), 40);
        assert_eq!(rect.bottom(), 60);
        assert_eq!(rect.center(), (25, 40));
    }

    #[test]
    fn test_offset_keeps_size() {
        let rect = Rectangle::new(5, 5, 21, 14).offset(100, 200);
        assert_eq!(rect, Rectangle::new(105, 205, 21, 14));
    }

    #[test]
    fn test_contains_is_half_open() {
        let rect = Rectangle::new(0, 0, 10, 10);
        assert!(rect.contains(0, 0));
        assert!(rect.contains(9, 9));
        assert!(!rect.contains(10, 5));
        assert!(!rect.contains(-1, 5));
    }

    #[test]
    fn test_parse() {
        let rect: Rectangle = "12, -4,100,50".parse().unwrap();
        assert_eq!(rect, Rectangle::new(12, -4, 100, 50));

        assert_eq!(
            "1,2,3".parse::<Rectangle>(),
            Err(RectangleParseError::WrongArity(3))
        );
        assert_eq!(
            "1,2,-3,4".parse::<Rectangle>(),
            Err(RectangleParseError::InvalidNumber("-3".to_string()))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Rectangle::new(1, 2, 3, 4).to_string(), "(1, 2, 3, 4)");
    }
}
