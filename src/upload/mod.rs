//! Server Upload
//!
//! Sends the cropped document plus extracted fields to the configured
//! endpoint as a single multipart POST: text parts `cnp` and `series`,
//! file part `image` with the JPEG-encoded crop.

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use reqwest::multipart;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::config::UploadConfig;

/// What the server said about one upload attempt.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Whether the server accepted the data (2xx)
    pub success: bool,
    /// HTTP status code, absent on transport errors
    pub status: Option<u16>,
    /// Server message or error description for the UI
    pub message: String,
}

/// Upload client. Owns its own runtime so callers can stay synchronous
/// on a worker thread.
pub struct Uploader {
    config: UploadConfig,
}

impl Uploader {
    /// Create an uploader for the given endpoint settings.
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    /// Encode the crop and post it together with the extracted fields.
    ///
    /// Transport failures are folded into a failed `UploadOutcome`; only
    /// local errors (JPEG encoding, runtime construction) bubble up.
    pub fn send(&self, cnp: &str, series: &str, crop: &RgbImage) -> Result<UploadOutcome> {
        let jpeg = encode_jpeg(crop, self.config.jpeg_quality)?;
        info!(
            "Uploading crop ({} bytes) for CNP {} to {}",
            jpeg.len(),
            cnp,
            self.config.server_url
        );
        self.send_encoded(cnp, series, jpeg)
    }

    /// Post already-encoded JPEG bytes.
    pub fn send_encoded(&self, cnp: &str, series: &str, jpeg: Vec<u8>) -> Result<UploadOutcome> {
        let runtime = Runtime::new().context("Failed to create upload runtime")?;
        runtime.block_on(self.post_multipart(cnp, series, jpeg))
    }

    async fn post_multipart(
        &self,
        cnp: &str,
        series: &str,
        jpeg: Vec<u8>,
    ) -> Result<UploadOutcome> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!self.config.verify_tls)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let filename = format!("crop_{cnp}_{series}.jpg");
        let image_part = multipart::Part::bytes(jpeg)
            .file_name(filename)
            .mime_str("image/jpeg")
            .context("Invalid image MIME type")?;

        let form = multipart::Form::new()
            .text("cnp", cnp.to_string())
            .text("series", series.to_string())
            .part("image", image_part);

        let response = match client
            .post(&self.config.server_url)
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Upload transport error: {}", e);
                return Ok(UploadOutcome {
                    success: false,
                    status: None,
                    message: format!("Network error: {e}"),
                });
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            // Servers answering JSON carry a human message; anything else
            // in a 2xx still counts as accepted
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str().map(String::from)))
                .unwrap_or_else(|| "Data sent successfully".to_string());
            info!("Upload accepted with status {}", status.as_u16());
            Ok(UploadOutcome {
                success: true,
                status: Some(status.as_u16()),
                message,
            })
        } else {
            // First 200 characters, never cutting inside a multibyte char
            let snippet: String = body.chars().take(200).collect();
            warn!("Upload rejected with status {}", status.as_u16());
            Ok(UploadOutcome {
                success: false,
                status: Some(status.as_u16()),
                message: format!("Server returned error: {} {}", status.as_u16(), snippet),
            })
        }
    }
}

/// Encode an image as JPEG at the given quality.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    image
        .write_with_encoder(encoder)
        .context("Failed to encode crop as JPEG")?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use image::Rgb;

    fn test_config(url: String) -> UploadConfig {
        UploadConfig {
            server_url: url,
            verify_tls: true,
            jpeg_quality: 85,
            timeout_secs: 5,
        }
    }

    fn test_crop() -> RgbImage {
        RgbImage::from_pixel(16, 16, Rgb([180, 180, 180]))
    }

    #[test]
    fn test_encode_jpeg_produces_jfif() {
        let bytes = encode_jpeg(&test_crop(), 85).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_upload_success_with_json_message() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/receive-data/")
                .body_contains("1234567890123")
                .body_contains("XB123456");
            then.status(200)
                .json_body(serde_json::json!({ "message": "stored" }));
        });

        let uploader = Uploader::new(test_config(server.url("/api/receive-data/")));
        let outcome = uploader
            .send("1234567890123", "XB123456", &test_crop())
            .unwrap();

        mock.assert();
        assert!(outcome.success);
        assert_eq!(outcome.status, Some(200));
        assert_eq!(outcome.message, "stored");
    }

    #[test]
    fn test_upload_success_with_non_json_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/receive-data/");
            then.status(201).body("ok");
        });

        let uploader = Uploader::new(test_config(server.url("/api/receive-data/")));
        let outcome = uploader
            .send("1234567890123", "XB123456", &test_crop())
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.status, Some(201));
        assert_eq!(outcome.message, "Data sent successfully");
    }

    #[test]
    fn test_upload_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/receive-data/");
            then.status(500).body("boom");
        });

        let uploader = Uploader::new(test_config(server.url("/api/receive-data/")));
        let outcome = uploader
            .send("1234567890123", "XB123456", &test_crop())
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.status, Some(500));
        assert!(outcome.message.contains("500"));
        assert!(outcome.message.contains("boom"));
    }

    #[test]
    fn test_upload_error_body_truncated_at_char_boundary() {
        let server = MockServer::start();
        // A multibyte character straddles the 200-byte mark
        let long_body = format!("{}é{}", "a".repeat(199), "b".repeat(300));
        server.mock(|when, then| {
            when.method(POST).path("/api/receive-data/");
            then.status(502).body(long_body.clone());
        });

        let uploader = Uploader::new(test_config(server.url("/api/receive-data/")));
        let outcome = uploader
            .send("1234567890123", "XB123456", &test_crop())
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.status, Some(502));
        let expected: String = long_body.chars().take(200).collect();
        assert!(expected.ends_with('é'));
        assert!(outcome.message.ends_with(&expected));
        assert!(!outcome.message.contains('b'));
    }

    #[test]
    fn test_upload_network_error() {
        // Port 1 is never listening
        let uploader = Uploader::new(test_config("http://127.0.0.1:1/api/".to_string()));
        let outcome = uploader
            .send("1234567890123", "XB123456", &test_crop())
            .unwrap();

        assert!(!outcome.success);
        assert!(outcome.status.is_none());
        assert!(outcome.message.starts_with("Network error"));
    }

    #[test]
    fn test_multipart_carries_image_part() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/receive-data/")
                .body_contains("crop_1234567890123_XB123456.jpg")
                .body_contains("image/jpeg");
            then.status(200);
        });

        let uploader = Uploader::new(test_config(server.url("/api/receive-data/")));
        let outcome = uploader
            .send("1234567890123", "XB123456", &test_crop())
            .unwrap();

        mock.assert();
        assert!(outcome.success);
    }
}
