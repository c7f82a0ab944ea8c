//! Storage Layer
//!
//! Platform directories and the on-disk lifecycle of accepted captures:
//! saved under the data dir when the user confirms an image, deleted on
//! discard or after a successful upload.

use anyhow::{Context, Result};
use chrono::Local;
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Get the application data directory
pub fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "docscan", "DocScan")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

    let data_dir = proj_dirs.data_dir().to_path_buf();
    std::fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "docscan", "DocScan")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Directory where accepted captures are kept until upload or discard
pub fn captures_dir() -> Result<PathBuf> {
    let dir = get_data_dir()?.join("captures");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Save a captured camera frame as JPEG in the captures directory.
pub fn save_capture(image: &RgbImage) -> Result<PathBuf> {
    save_capture_to(&captures_dir()?, image)
}

/// Copy a user-picked file into the captures directory.
pub fn save_upload_copy(source: &Path) -> Result<PathBuf> {
    save_upload_copy_to(&captures_dir()?, source)
}

/// Save a frame as `capture_YYYYmmdd_HHMMSS.jpg` in the given directory.
pub fn save_capture_to(dir: &Path, image: &RgbImage) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("capture_{timestamp}.jpg"));
    image
        .save(&path)
        .with_context(|| format!("Failed to save capture to {:?}", path))?;
    info!("Saved capture: {:?}", path);
    Ok(path)
}

/// Copy a picked file as `upload_YYYYmmdd_HHMMSS.<ext>` into the given
/// directory, preserving the original extension.
pub fn save_upload_copy_to(dir: &Path, source: &Path) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jpg");
    let path = dir.join(format!("upload_{timestamp}.{ext}"));
    std::fs::copy(source, &path)
        .with_context(|| format!("Failed to copy {:?} to {:?}", source, path))?;
    info!("Saved picked file: {:?}", path);
    Ok(path)
}

/// Remove a saved capture. Missing files are not an error; a file that
/// cannot be removed is logged and reported.
pub fn discard_capture(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!("Removed capture: {:?}", path);
            Ok(())
        }
        Err(e) => {
            warn!("Could not remove capture {:?}: {}", path, e);
            Err(e).with_context(|| format!("Failed to remove {:?}", path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::tempdir;

    #[test]
    fn test_save_capture_writes_jpeg() {
        let dir = tempdir().unwrap();
        let img = RgbImage::from_pixel(8, 8, Rgb([200, 200, 200]));

        let path = save_capture_to(dir.path(), &img).unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("capture_"));
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn test_save_upload_copy_keeps_extension() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("photo.png");
        let img = RgbImage::from_pixel(4, 4, Rgb([10, 10, 10]));
        img.save(&source).unwrap();

        let path = save_upload_copy_to(dir.path(), &source).unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("upload_"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_discard_removes_file() {
        let dir = tempdir().unwrap();
        let img = RgbImage::from_pixel(4, 4, Rgb([10, 10, 10]));
        let path = save_capture_to(dir.path(), &img).unwrap();

        discard_capture(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_discard_missing_file_is_ok() {
        let dir = tempdir().unwrap();
        assert!(discard_capture(&dir.path().join("gone.jpg")).is_ok());
    }
}
