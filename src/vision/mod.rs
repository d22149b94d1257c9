//! Vision Layer
//!
//! The per-tick pipeline: acquire a frame, detect a barcode, crop to the
//! committed region of interest, run OCR on the crop, and compose the
//! annotated output. One call to [`VisionPipeline::tick`] is one tick; the
//! shell drives it on a fixed interval while the session is live.

pub mod annotate;
pub mod barcode;
pub mod ocr;

use anyhow::Result;
use image::imageops;
use image::RgbImage;
use tracing::debug;

use crate::capture::FrameSource;
use crate::geometry::Rect;
use crate::storage::LookupStore;

pub use barcode::{BarcodeReader, Detection, QrReader};
pub use ocr::{TesseractOcr, TextRecognizer};

/// Whether the stored text for the decoded barcode matches the OCR result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agreement {
    Match,
    Mismatch,
}

/// The agreement indicator for one tick: the expected text from the lookup
/// store and how it compares to what OCR read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub expected: String,
    pub agreement: Agreement,
}

/// Everything one tick produced for rendering.
#[derive(Debug, Clone)]
pub struct TickOutput {
    /// Frame scaled to canvas size, barcode box already drawn in
    pub frame: RgbImage,
    /// First detected barcode, if any
    pub barcode: Option<Detection>,
    /// OCR result for the committed region, if non-empty
    pub ocr_text: Option<String>,
    /// Agreement indicator; present only when a barcode was decoded, OCR
    /// produced text, and the store has a mapping for the barcode
    pub verdict: Option<Verdict>,
}

/// Pure comparison behind the agreement indicator.
pub fn judge(expected: &str, ocr_text: &str) -> Agreement {
    if expected == ocr_text {
        Agreement::Match
    } else {
        Agreement::Mismatch
    }
}

/// The per-tick vision pipeline.
///
/// Reads the committed region and the lookup store every tick and mutates
/// neither. OCR and barcode engines sit behind capability traits so tests
/// can substitute mocks.
pub struct VisionPipeline {
    recognizer: Box<dyn TextRecognizer>,
    reader: Box<dyn BarcodeReader>,
    canvas: Rect,
}

impl VisionPipeline {
    pub fn new(
        recognizer: Box<dyn TextRecognizer>,
        reader: Box<dyn BarcodeReader>,
        canvas: Rect,
    ) -> Self {
        Self {
            recognizer,
            reader,
            canvas,
        }
    }

    /// Run one tick.
    ///
    /// Returns `Ok(None)` when no frame was available: a silent skip with no
    /// visible effect. Any other failure is a real error.
    pub fn tick(
        &mut self,
        source: &mut dyn FrameSource,
        committed: Rect,
        store: &LookupStore,
    ) -> Result<Option<TickOutput>> {
        let Some(frame) = source.acquire_frame()? else {
            debug!("tick skipped: no frame");
            return Ok(None);
        };

        // Normalize to canvas size so region coordinates line up
        let mut image = self.scale_to_canvas(frame.image);

        // Full-frame barcode detection; only the first hit is used
        let gray = imageops::grayscale(&image);
        let barcode = self.reader.decode_all(&gray)?.into_iter().next();

        // OCR runs on the committed-region crop only, never the full frame.
        // Crop before the box is drawn so annotation can't leak into OCR.
        let ocr_text = match committed.intersect(self.canvas) {
            Some(roi) => {
                let crop = imageops::crop_imm(
                    &image,
                    roi.left as u32,
                    roi.top as u32,
                    roi.width() as u32,
                    roi.height() as u32,
                )
                .to_image();
                let text = self.recognizer.recognize(&crop)?;
                let text = text.trim();
                if text.is_empty() {
                    None
                } else {
                    Some(text.to_string())
                }
            }
            None => None,
        };

        if let Some(detection) = &barcode {
            annotate::draw_barcode_box(&mut image, detection.bounds);
        }

        // Agreement indicator needs both a decoded barcode and OCR text;
        // an unmapped barcode renders nothing at all.
        let verdict = match (&barcode, &ocr_text) {
            (Some(detection), Some(text)) => {
                store.lookup(&detection.value)?.map(|expected| Verdict {
                    agreement: judge(&expected, text),
                    expected,
                })
            }
            _ => None,
        };

        Ok(Some(TickOutput {
            frame: image,
            barcode,
            ocr_text,
            verdict,
        }))
    }

    fn scale_to_canvas(&self, image: RgbImage) -> RgbImage {
        let (w, h) = (self.canvas.width() as u32, self.canvas.height() as u32);
        if image.width() == w && image.height() == h {
            image
        } else {
            imageops::resize(&image, w, h, imageops::FilterType::Triangle)
        }
    }
}
