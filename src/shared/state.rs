//! Shared application state between the UI and the job coordinator

use std::path::PathBuf;

use crate::config::AppConfig;

/// Central shared state behind an `Arc<RwLock<_>>`.
#[derive(Debug, Clone)]
pub struct SharedAppState {
    /// Application configuration
    pub config: AppConfig,
    /// Runtime state (not persisted)
    pub runtime: RuntimeState,
}

impl SharedAppState {
    /// Create a new shared state with the given configuration
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            runtime: RuntimeState::default(),
        }
    }
}

impl Default for SharedAppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

/// Command to control the camera from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraCommand {
    /// Open the configured device and start the preview
    Start,
    /// Stop the preview and release the device
    Stop,
}

/// Runtime state that is not persisted
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    /// Whether the camera is currently streaming
    pub is_camera_running: bool,
    /// Whether an OCR scan is in flight
    pub is_scanning: bool,
    /// Whether an upload is in flight
    pub is_uploading: bool,
    /// Last error message (if any)
    pub last_error: Option<String>,
    /// One-line summary of the last finished scan
    pub last_scan_summary: Option<String>,
    /// Pending camera command from the UI
    pub camera_command: Option<CameraCommand>,
    /// UI requested the current preview frame to be captured
    pub capture_frame_requested: bool,
    /// User picked an image file to process
    pub pending_file: Option<PathBuf>,
}

impl RuntimeState {
    /// Clear any error state
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Set an error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_lifecycle() {
        let mut runtime = RuntimeState::default();
        assert!(runtime.last_error.is_none());

        runtime.set_error("camera missing");
        assert_eq!(runtime.last_error.as_deref(), Some("camera missing"));

        runtime.clear_error();
        assert!(runtime.last_error.is_none());
    }

    #[test]
    fn test_shared_state_carries_config() {
        let mut config = AppConfig::default();
        config.camera.device_index = 3;
        let state = SharedAppState::new(config);
        assert_eq!(state.config.camera.device_index, 3);
        assert!(!state.runtime.is_camera_running);
    }
}
