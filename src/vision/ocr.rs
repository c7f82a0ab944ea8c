//! OCR engine
//!
//! Thin wrapper over Tesseract (via leptess) tuned for identity document
//! text: uppercase letters, digits, and the few separators that appear
//! around the CNP and series fields.

use anyhow::{Context, Result};
use image::RgbImage;
use leptess::{LepTess, Variable};

/// Characters that can appear in the fields we care about. Restricting
/// the whitelist keeps Tesseract from hallucinating lowercase noise.
const CHAR_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 .:<>-";

/// Tesseract-backed OCR engine.
///
/// Construct one per scan on the worker thread; the underlying handle is
/// not shared across threads.
pub struct OcrEngine {
    tess: LepTess,
}

impl OcrEngine {
    /// Initialize Tesseract for the given language (e.g. "eng").
    pub fn new(language: &str) -> Result<Self> {
        let mut tess = LepTess::new(None, language)
            .context("Failed to initialize Tesseract. Is Tesseract installed?")?;

        tess.set_variable(Variable::TesseditCharWhitelist, CHAR_WHITELIST)
            .context("Failed to set character whitelist")?;

        Ok(Self { tess })
    }

    /// Run OCR over an image and return the recognized text with line
    /// breaks collapsed to single spaces, matching how the extraction
    /// regexes expect to see the document as one paragraph.
    pub fn recognize(&mut self, image: &RgbImage) -> Result<String> {
        // leptess wants encoded image bytes, not a raw buffer
        let mut png_bytes = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut png_bytes);
        image
            .write_to(&mut cursor, image::ImageFormat::Png)
            .context("Failed to encode crop as PNG")?;

        self.tess
            .set_image_from_mem(&png_bytes)
            .context("Failed to load image into Tesseract")?;

        // Tesseract works best around 300 DPI; must be set after the image
        self.tess.set_source_resolution(300);

        let text = self
            .tess
            .get_utf8_text()
            .context("Failed to extract text from image")?;

        Ok(join_lines(&text))
    }
}

/// Collapse whitespace runs and newlines into single spaces.
fn join_lines(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_lines_collapses_whitespace() {
        assert_eq!(join_lines("CNP\n1234567890123\n\nXB  123456"),
            "CNP 1234567890123 XB 123456");
    }

    #[test]
    fn test_join_lines_empty() {
        assert_eq!(join_lines("\n \n"), "");
    }

    #[test]
    fn test_whitelist_covers_field_alphabet() {
        for code in crate::extract::VALID_COUNTY_CODES {
            for ch in code.chars() {
                assert!(CHAR_WHITELIST.contains(ch), "missing {ch} in whitelist");
            }
        }
        assert!(('0'..='9').all(|d| CHAR_WHITELIST.contains(d)));
    }
}
