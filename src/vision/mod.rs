//! Vision Layer
//!
//! Turns a photographed or uploaded image into a document crop plus
//! extracted fields: locate the document region, optionally preprocess
//! the crop, run OCR once, and apply the field regexes to the text.

pub mod document;
pub mod ocr;
pub mod preprocess;

pub use document::locate_document;
pub use ocr::OcrEngine;
pub use preprocess::apply_preprocessing;

use image::RgbImage;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::OcrConfig;
use crate::extract::ExtractedFields;

/// Classified failures of the document pipeline.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("no document-shaped region found in the image")]
    NoDocumentRegion,
    #[error("OCR failed: {0}")]
    Ocr(#[source] anyhow::Error),
}

/// Result of processing one image end to end.
#[derive(Debug, Clone)]
pub struct DocumentScan {
    /// Cropped document region from the source image
    pub crop: RgbImage,
    /// Raw OCR text (lines joined with spaces)
    pub ocr_text: String,
    /// Extracted CNP and series, either may be absent
    pub fields: ExtractedFields,
    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Document processing pipeline. Cheap to construct; OCR state lives only
/// for the duration of one `process` call.
pub struct DocumentPipeline {
    config: OcrConfig,
}

impl DocumentPipeline {
    /// Create a pipeline with the given OCR settings.
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Locate, preprocess, and OCR the document, then extract fields.
    pub fn process(&self, image: &RgbImage) -> Result<DocumentScan, VisionError> {
        let start = Instant::now();

        let crop = locate_document(image)?;
        debug!("Document region: {}x{}", crop.width(), crop.height());

        let prepared = apply_preprocessing(&crop, &self.config.preprocessing);

        let mut engine = OcrEngine::new(&self.config.language).map_err(VisionError::Ocr)?;
        let ocr_text = engine.recognize(&prepared).map_err(VisionError::Ocr)?;
        debug!("OCR text: {}", ocr_text);

        let fields = ExtractedFields::from_text(&ocr_text);

        let processing_time = start.elapsed();
        info!(
            "Scan complete in {:?}: cnp={}, series={}",
            processing_time,
            fields.cnp.is_some(),
            fields.series.is_some()
        );

        Ok(DocumentScan {
            crop,
            ocr_text,
            fields,
            processing_time_ms: processing_time.as_millis() as u64,
        })
    }
}
