//! Barcode decoding behind the [`BarcodeReader`] capability
//!
//! The production backend scans the grayscale frame with quircs and converts
//! each symbol's corner points into an axis-aligned bounding box. Symbols
//! that fail to extract or decode are skipped; zero detections is a normal
//! outcome, not an error.

use anyhow::Result;
use image::GrayImage;
use tracing::debug;

use crate::geometry::Rect;

/// A decoded barcode and where it sits in the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Decoded payload
    pub value: String,
    /// Axis-aligned bounding box in frame coordinates
    pub bounds: Rect,
}

/// Capability consumed by the vision pipeline: decode every visible barcode.
pub trait BarcodeReader {
    fn decode_all(&mut self, image: &GrayImage) -> Result<Vec<Detection>>;
}

/// QR decoder backed by quircs.
#[derive(Default)]
pub struct QrReader {
    decoder: quircs::Quirc,
}

impl QrReader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BarcodeReader for QrReader {
    fn decode_all(&mut self, image: &GrayImage) -> Result<Vec<Detection>> {
        let mut detections = Vec::new();
        let codes = self.decoder.identify(
            image.width() as usize,
            image.height() as usize,
            image.as_raw(),
        );
        for code in codes {
            let code = match code {
                Ok(code) => code,
                Err(e) => {
                    debug!(error = %e, "failed to extract barcode symbol");
                    continue;
                }
            };
            let decoded = match code.decode() {
                Ok(decoded) => decoded,
                Err(e) => {
                    debug!(error = %e, "failed to decode barcode symbol");
                    continue;
                }
            };
            let value = match String::from_utf8(decoded.payload) {
                Ok(value) => value,
                Err(_) => {
                    debug!("barcode payload is not valid UTF-8");
                    continue;
                }
            };
            detections.push(Detection {
                value,
                bounds: corners_to_bounds(&code.corners),
            });
        }
        Ok(detections)
    }
}

/// Bounding box of a symbol's four (possibly skewed) corner points.
fn corners_to_bounds(corners: &[quircs::Point; 4]) -> Rect {
    let xs = corners.iter().map(|p| p.x);
    let ys = corners.iter().map(|p| p.y);
    Rect::new(
        xs.clone().min().unwrap_or(0),
        ys.clone().min().unwrap_or(0),
        xs.max().unwrap_or(0),
        ys.max().unwrap_or(0),
    )
}
