//! Frame data for captured camera content

use image::RgbImage;
use std::time::Instant;

/// A captured frame from the camera, already converted to RGB.
///
/// Ephemeral: lives only for the duration of one pipeline tick.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Decoded RGB pixels
    pub image: RgbImage,
    /// Timestamp when the frame was captured
    pub timestamp: Instant,
}

impl Frame {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image,
            timestamp: Instant::now(),
        }
    }

    /// Frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}
