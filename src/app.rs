//! Job Coordinator
//!
//! Owns the channel between worker threads and the UI, and spawns the two
//! long-running jobs (OCR scan, upload) so the window never blocks.

use crossbeam_channel::{unbounded, Receiver, Sender};
use image::RgbImage;
use std::path::PathBuf;
use std::thread::JoinHandle;
use tracing::info;

use crate::config::{OcrConfig, UploadConfig};
use crate::shared::WorkerEvent;
use crate::upload::Uploader;
use crate::vision::DocumentPipeline;

/// Spawns background jobs and funnels their results back to the UI.
pub struct JobCoordinator {
    events_tx: Sender<WorkerEvent>,
    events_rx: Receiver<WorkerEvent>,
    scan_handle: Option<JoinHandle<()>>,
    upload_handle: Option<JoinHandle<()>>,
}

impl JobCoordinator {
    /// Create a coordinator with an unbounded event channel.
    pub fn new() -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            events_tx,
            events_rx,
            scan_handle: None,
            upload_handle: None,
        }
    }

    /// Drain one pending worker event, if any. Called once per UI frame.
    pub fn try_recv(&self) -> Option<WorkerEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Whether an OCR scan thread is still running.
    pub fn is_scan_running(&self) -> bool {
        self.scan_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Whether an upload thread is still running.
    pub fn is_upload_running(&self) -> bool {
        self.upload_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Run the document pipeline on a background thread.
    ///
    /// `source_path` is the saved copy of the image; it travels with the
    /// result so the UI can delete it on discard or after upload.
    pub fn spawn_scan(&mut self, image: RgbImage, source_path: PathBuf, config: OcrConfig) {
        let tx = self.events_tx.clone();
        let handle = std::thread::spawn(move || {
            info!("Scan thread starting for {:?}", source_path);
            let pipeline = DocumentPipeline::new(config);
            let event = match pipeline.process(&image) {
                Ok(scan) => WorkerEvent::ScanFinished { scan, source_path },
                Err(e) => WorkerEvent::ScanFailed {
                    error: e.to_string(),
                    source_path,
                },
            };
            let _ = tx.send(event);
        });
        self.scan_handle = Some(handle);
    }

    /// Post the crop and fields to the server on a background thread.
    pub fn spawn_upload(
        &mut self,
        cnp: String,
        series: String,
        crop: RgbImage,
        config: UploadConfig,
    ) {
        let tx = self.events_tx.clone();
        let handle = std::thread::spawn(move || {
            info!("Upload thread starting for CNP {}", cnp);
            let uploader = Uploader::new(config);
            let event = match uploader.send(&cnp, &series, &crop) {
                Ok(outcome) => WorkerEvent::UploadDone(outcome),
                Err(e) => WorkerEvent::UploadFailed(e.to_string()),
            };
            let _ = tx.send(event);
        });
        self.upload_handle = Some(handle);
    }
}

impl Default for JobCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for JobCoordinator {
    fn drop(&mut self) {
        // Let in-flight jobs finish; they only hold a channel sender
        if let Some(handle) = self.scan_handle.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.upload_handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OcrPreprocessing;
    use image::Rgb;
    use std::time::Duration;

    #[test]
    fn test_scan_failure_is_reported() {
        let mut coordinator = JobCoordinator::new();
        // All-dark image has no document-colored region
        let image = RgbImage::from_pixel(20, 20, Rgb([5, 5, 5]));
        let config = OcrConfig {
            language: "eng".to_string(),
            preprocessing: OcrPreprocessing::default(),
        };

        coordinator.spawn_scan(image, PathBuf::from("/tmp/none.jpg"), config);

        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(event) = coordinator.try_recv() {
                match event {
                    WorkerEvent::ScanFailed { error, source_path } => {
                        assert!(error.contains("no document-shaped region"));
                        assert_eq!(source_path, PathBuf::from("/tmp/none.jpg"));
                        return;
                    }
                    other => panic!("unexpected event: {other:?}"),
                }
            }
            assert!(std::time::Instant::now() < deadline, "no event received");
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_idle_coordinator_reports_no_jobs() {
        let coordinator = JobCoordinator::new();
        assert!(!coordinator.is_scan_running());
        assert!(!coordinator.is_upload_running());
        assert!(coordinator.try_recv().is_none());
    }
}
