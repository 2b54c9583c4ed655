//! Frame data structures for captured screen content

use image::{imageops, RgbImage};
use std::time::Instant;

use crate::geometry::Rectangle;

/// Pixels captured from a region of the screen
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// RGB pixel data
    pub image: RgbImage,
    /// Absolute rectangle the pixels were taken from
    pub bounds: Rectangle,
    /// Timestamp when frame was captured
    pub timestamp: Instant,
}

impl CapturedFrame {
    /// Create a new captured frame whose top-left pixel sits at (left, top)
    pub fn new(image: RgbImage, left: i32, top: i32) -> Self {
        let (width, height) = image.dimensions();
        Self {
            image,
            bounds: Rectangle::new(left, top, width, height),
            timestamp: Instant::now(),
        }
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Cut out an absolute sub-rectangle of this frame.
    ///
    /// Returns `None` unless `rect` lies fully inside `self.bounds`.
    pub fn crop(&self, rect: &Rectangle) -> Option<CapturedFrame> {
        if rect.left < self.bounds.left
            || rect.top < self.bounds.top
            || rect.right() > self.bounds.right()
            || rect.bottom() > self.bounds.bottom()
        {
            return None;
        }

        let x = (rect.left - self.bounds.left) as u32;
        let y = (rect.top - self.bounds.top) as u32;
        let image = imageops::crop_imm(&self.image, x, y, rect.width, rect.height).to_image();

        Some(Self {
            image,
            bounds: *rect,
            timestamp: self.timestamp,
        })
    }
}
