//! OCR behind the [`TextRecognizer`] capability
//!
//! The production backend is Tesseract via leptess, initialized once with a
//! single configured language. leptess wants image bytes in a standard
//! container, so the crop is encoded as PNG before being handed over.

use std::io::Cursor;

use anyhow::{Context, Result};
use image::RgbImage;
use leptess::LepTess;

/// Capability consumed by the vision pipeline: extract text from an image.
///
/// An empty or whitespace-only result means "no text found" and is normal.
pub trait TextRecognizer {
    fn recognize(&mut self, image: &RgbImage) -> Result<String>;
}

/// Tesseract-backed recognizer.
pub struct TesseractOcr {
    engine: LepTess,
}

impl TesseractOcr {
    /// Initialize Tesseract for the given language (e.g. "eng", "jpn").
    pub fn new(language: &str) -> Result<Self> {
        let engine = LepTess::new(None, language).with_context(|| {
            format!(
                "failed to initialize Tesseract for language {:?}; is it installed?",
                language
            )
        })?;
        Ok(Self { engine })
    }
}

impl TextRecognizer for TesseractOcr {
    fn recognize(&mut self, image: &RgbImage) -> Result<String> {
        let mut png_bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
            .context("failed to encode OCR crop as PNG")?;

        self.engine
            .set_image_from_mem(&png_bytes)
            .context("failed to load image into Tesseract")?;
        self.engine.set_source_resolution(300);

        let text = self
            .engine
            .get_utf8_text()
            .context("failed to extract text from image")?;
        Ok(text)
    }
}
