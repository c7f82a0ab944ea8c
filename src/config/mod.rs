//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Camera settings
    pub camera: CameraSettings,
    /// OCR settings
    pub ocr: OcrConfig,
    /// Upload settings
    pub upload: UploadConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Jump to the review view automatically after a capture
    pub auto_review: bool,
    /// Keep saved captures after a successful upload
    pub keep_uploaded_files: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            auto_review: true,
            keep_uploaded_files: false,
        }
    }
}

/// Camera-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Device index (0 = default camera)
    pub device_index: u32,
    /// Requested frame width
    pub width: u32,
    /// Requested frame height
    pub height: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: 1280,
            height: 720,
        }
    }
}

/// OCR pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language pack
    pub language: String,
    /// Filters applied to the crop before OCR
    pub preprocessing: OcrPreprocessing,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            preprocessing: OcrPreprocessing::default(),
        }
    }
}

/// Preprocessing filter settings for OCR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrPreprocessing {
    /// Master switch for all filters
    pub enabled: bool,
    /// Convert to grayscale before OCR
    pub grayscale: bool,
    /// Invert colors (light text on dark documents)
    pub invert: bool,
    /// Contrast factor, 1.0 = unchanged
    pub contrast: f32,
    /// Sharpen strength, 0.0 = off
    pub sharpen: f32,
    /// Integer upscale factor, 1 = unchanged
    pub scale: u32,
}

impl Default for OcrPreprocessing {
    fn default() -> Self {
        Self {
            enabled: false,
            grayscale: true,
            invert: false,
            contrast: 1.0,
            sharpen: 0.0,
            scale: 1,
        }
    }
}

/// Upload endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Multipart POST endpoint
    pub server_url: String,
    /// Verify the server's TLS certificate
    pub verify_tls: bool,
    /// JPEG quality for the encoded crop (1-100)
    pub jpeg_quality: u8,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            // Local-network endpoint with a self-signed certificate,
            // hence verify_tls defaults to off
            server_url: "https://192.168.0.102/api/receive-data/".to_string(),
            verify_tls: false,
            jpeg_quality: 85,
            timeout_secs: 30,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert!(config.general.auto_review);
        assert!(!config.general.keep_uploaded_files);

        assert_eq!(config.camera.device_index, 0);
        assert_eq!(config.camera.width, 1280);
        assert_eq!(config.camera.height, 720);

        assert_eq!(config.ocr.language, "eng");
        assert!(!config.ocr.preprocessing.enabled);
        assert_eq!(config.ocr.preprocessing.scale, 1);

        assert_eq!(config.upload.server_url, "https://192.168.0.102/api/receive-data/");
        assert!(!config.upload.verify_tls);
        assert_eq!(config.upload.jpeg_quality, 85);
        assert_eq!(config.upload.timeout_secs, 30);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig::default();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.general.auto_review, parsed.general.auto_review);
        assert_eq!(config.camera.device_index, parsed.camera.device_index);
        assert_eq!(config.ocr.language, parsed.ocr.language);
        assert_eq!(config.upload.server_url, parsed.upload.server_url);
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.camera.device_index = 2;
        config.upload.server_url = "https://example.test/api/".to_string();
        config.upload.verify_tls = true;
        config.ocr.preprocessing.enabled = true;
        config.ocr.preprocessing.scale = 3;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.camera.device_index, 2);
        assert_eq!(parsed.upload.server_url, "https://example.test/api/");
        assert!(parsed.upload.verify_tls);
        assert!(parsed.ocr.preprocessing.enabled);
        assert_eq!(parsed.ocr.preprocessing.scale, 3);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig = toml::from_str("[upload]\nverify_tls = true\n").unwrap();
        assert!(parsed.upload.verify_tls);
        assert_eq!(parsed.upload.jpeg_quality, 85);
        assert_eq!(parsed.ocr.language, "eng");
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();

        let temp_file = NamedTempFile::new().unwrap();
        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(config.upload.server_url, loaded.upload.server_url);
        assert_eq!(config.camera.width, loaded.camera.width);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
