//! Screen Capture Layer
//!
//! Supplies the pixels of a match region. Live acquisition is left to the
//! embedding application; this layer works from saved screenshots.

pub mod frame;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

pub use frame::CapturedFrame;

/// Load a saved screenshot as a frame anchored at the screen origin
pub fn load_screenshot(path: &Path) -> Result<CapturedFrame> {
    let image = image::open(path)
        .with_context(|| format!("Failed to load screenshot: {:?}", path))?
        .to_rgb8();

    debug!(
        "Loaded screenshot {:?} ({}x{})",
        path,
        image.width(),
        image.height()
    );

    Ok(CapturedFrame::new(image, 0, 0))
}
