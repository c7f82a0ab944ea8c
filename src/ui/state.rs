//! UI view state

use egui::TextureHandle;
use image::RgbImage;
use std::path::PathBuf;
use std::time::Instant;

use crate::upload::UploadOutcome;
use crate::vision::DocumentScan;

/// Current view in the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Capture,
    Review,
    Settings,
}

impl View {
    /// Display name for the sidebar
    pub fn name(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Capture => "Capture",
            View::Review => "Review",
            View::Settings => "Settings",
        }
    }

    /// All views in sidebar order
    pub fn all() -> [View; 4] {
        [View::Home, View::Capture, View::Review, View::Settings]
    }
}

/// Overall UI state
#[derive(Default)]
pub struct UiState {
    /// Current active view
    pub current_view: View,
    /// Capture view state
    pub capture: CaptureViewState,
    /// Review view state
    pub review: ReviewViewState,
    /// Settings view state
    pub settings: SettingsViewState,
}

/// Capture view state
#[derive(Default)]
pub struct CaptureViewState {
    /// Live preview texture
    pub preview_texture: Option<TextureHandle>,
    /// Dimensions of the texture, for change detection
    pub preview_size: Option<(u32, u32)>,
    /// Detected camera device names
    pub available_devices: Vec<String>,
    /// When the device list was last refreshed
    pub last_refresh: Option<Instant>,
}

/// Where the review workflow currently stands.
///
/// The flow mirrors the user's decisions: an accepted image waits for
/// Process, a scan runs in the background, results wait for Send or
/// Discard, and an upload runs in the background.
#[derive(Debug, Default)]
pub enum ReviewStage {
    /// Nothing to review yet
    #[default]
    Empty,
    /// Image accepted, waiting for the user to hit Process
    Pending {
        image: RgbImage,
        source_path: PathBuf,
    },
    /// OCR pipeline running on a worker thread
    Scanning { source_path: PathBuf },
    /// Scan results on screen
    Scanned {
        scan: DocumentScan,
        source_path: PathBuf,
    },
    /// Upload running on a worker thread
    Uploading {
        scan: DocumentScan,
        source_path: PathBuf,
    },
}

/// Review view state
#[derive(Default)]
pub struct ReviewViewState {
    /// Current workflow stage
    pub stage: ReviewStage,
    /// Texture of the pending image
    pub preview_texture: Option<TextureHandle>,
    /// Texture of the document crop
    pub crop_texture: Option<TextureHandle>,
    /// Final outcome banner from the last upload
    pub last_outcome: Option<UploadOutcome>,
    /// User clicked Process this frame
    pub process_requested: bool,
    /// User clicked Discard this frame
    pub discard_requested: bool,
    /// User clicked Send to Server this frame
    pub send_requested: bool,
}

impl ReviewViewState {
    /// Reset to an empty review, dropping any textures.
    pub fn reset(&mut self) {
        self.stage = ReviewStage::Empty;
        self.preview_texture = None;
        self.crop_texture = None;
        self.process_requested = false;
        self.discard_requested = false;
        self.send_requested = false;
    }

    /// Move to a fresh pending image, invalidating stale textures.
    pub fn set_pending(&mut self, image: RgbImage, source_path: PathBuf) {
        self.reset();
        self.last_outcome = None;
        self.stage = ReviewStage::Pending { image, source_path };
    }
}

/// Settings view state
#[derive(Default)]
pub struct SettingsViewState {
    /// Shown after a successful save
    pub saved_at: Option<Instant>,
    /// Shown when saving failed
    pub save_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_view_names() {
        assert_eq!(View::Home.name(), "Home");
        assert_eq!(View::all().len(), 4);
    }

    #[test]
    fn test_set_pending_clears_requests() {
        let mut review = ReviewViewState {
            process_requested: true,
            send_requested: true,
            ..Default::default()
        };
        let img = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        review.set_pending(img, PathBuf::from("/tmp/x.jpg"));

        assert!(!review.process_requested);
        assert!(!review.send_requested);
        assert!(matches!(review.stage, ReviewStage::Pending { .. }));
    }
}
