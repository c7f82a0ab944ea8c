//! Camera Capture Layer
//!
//! Wraps nokhwa for webcam enumeration and frame grabbing. Frames are
//! decoded to RGB so the rest of the pipeline never sees device formats.

pub mod frame;

use anyhow::{Context, Result};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution,
};
use nokhwa::{query, Camera};
use tracing::info;

use frame::CapturedFrame;

/// Camera capture configuration
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Device index (0 = default camera)
    pub device_index: u32,
    /// Requested frame width; 0 picks the device's highest resolution
    pub width: u32,
    /// Requested frame height; 0 picks the device's highest resolution
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: 1280,
            height: 720,
        }
    }
}

/// An open webcam streaming frames.
///
/// Owned by the UI thread; nokhwa camera handles are not shared across
/// threads.
pub struct CameraCapture {
    camera: Camera,
}

impl CameraCapture {
    /// List human-readable names of available cameras, in index order.
    pub fn list_devices() -> Result<Vec<String>> {
        let cameras = query(ApiBackend::Auto).context("Camera enumeration failed")?;
        Ok(cameras
            .iter()
            .map(|info| format!("[{}] {}", info.index(), info.human_name()))
            .collect())
    }

    /// Open the configured device and start streaming.
    pub fn open(config: CameraConfig) -> Result<Self> {
        let requested = if config.width == 0 || config.height == 0 {
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution)
        } else {
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
                Resolution::new(config.width, config.height),
                FrameFormat::MJPEG,
                30,
            )))
        };

        let mut camera = Camera::new(CameraIndex::Index(config.device_index), requested)
            .with_context(|| format!("Could not open camera {}", config.device_index))?;
        camera
            .open_stream()
            .context("Could not start camera stream")?;

        let resolution = camera.resolution();
        info!(
            "Camera {} open at {}x{}",
            config.device_index,
            resolution.width(),
            resolution.height()
        );

        Ok(Self { camera })
    }

    /// Grab and decode the next frame.
    pub fn next_frame(&mut self) -> Result<CapturedFrame> {
        let buffer = self.camera.frame().context("Failed to read camera frame")?;
        let image = buffer
            .decode_image::<RgbFormat>()
            .context("Failed to decode camera frame")?;
        Ok(CapturedFrame::from_image(image))
    }

    /// Stop streaming and release the device.
    pub fn stop(&mut self) -> Result<()> {
        self.camera
            .stop_stream()
            .context("Failed to stop camera stream")
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        let _ = self.camera.stop_stream();
    }
}
