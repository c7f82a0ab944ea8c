//! Main application window
//!
//! Owns the camera handle and the job coordinator, and runs the per-frame
//! loop: execute UI commands, pump the camera, dispatch background jobs,
//! and fold worker events back into the view state.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::app::JobCoordinator;
use crate::capture::frame::CapturedFrame;
use crate::capture::{CameraCapture, CameraConfig};
use crate::shared::{CameraCommand, SharedAppState, WorkerEvent};
use crate::storage;
use crate::ui::state::{ReviewStage, UiState, View};
use crate::ui::theme;
use crate::ui::views;
use crate::ui::widgets;

/// Main application
pub struct DocScanApp {
    /// State shared with worker threads
    shared_state: Arc<RwLock<SharedAppState>>,
    /// View state owned by the UI thread
    ui_state: UiState,
    /// Background job spawner and event channel
    coordinator: JobCoordinator,
    /// Open camera, if streaming. Lives on the UI thread only.
    camera: Option<CameraCapture>,
    /// Most recent camera frame, for preview and capture
    latest_frame: Option<CapturedFrame>,
    theme_applied: bool,
}

impl DocScanApp {
    pub fn new(shared_state: Arc<RwLock<SharedAppState>>) -> Self {
        Self {
            shared_state,
            ui_state: UiState::default(),
            coordinator: JobCoordinator::new(),
            camera: None,
            latest_frame: None,
            theme_applied: false,
        }
    }

    /// Execute a pending camera command from any view.
    fn process_camera_command(&mut self) {
        let command = self.shared_state.write().runtime.camera_command.take();
        match command {
            Some(CameraCommand::Start) => {
                if self.camera.is_some() {
                    return;
                }
                let camera_settings = self.shared_state.read().config.camera.clone();
                let config = CameraConfig {
                    device_index: camera_settings.device_index,
                    width: camera_settings.width,
                    height: camera_settings.height,
                };
                match CameraCapture::open(config) {
                    Ok(camera) => {
                        self.camera = Some(camera);
                        let mut state = self.shared_state.write();
                        state.runtime.is_camera_running = true;
                        state.runtime.clear_error();
                    }
                    Err(e) => {
                        error!("Camera open failed: {}", e);
                        self.shared_state
                            .write()
                            .runtime
                            .set_error(format!("Could not open camera: {e}"));
                    }
                }
            }
            Some(CameraCommand::Stop) => {
                if let Some(mut camera) = self.camera.take() {
                    if let Err(e) = camera.stop() {
                        warn!("Camera stop failed: {}", e);
                    }
                }
                self.latest_frame = None;
                self.shared_state.write().runtime.is_camera_running = false;
            }
            None => {}
        }
    }

    /// Grab the next frame while the camera is streaming.
    fn pump_camera(&mut self) {
        if let Some(camera) = &mut self.camera {
            match camera.next_frame() {
                Ok(frame) => self.latest_frame = Some(frame),
                Err(e) => {
                    warn!("Frame grab failed: {}", e);
                }
            }
        }
    }

    /// Handle the Capture Frame button: save the current frame and move it
    /// into review.
    fn process_capture_request(&mut self) {
        let requested = {
            let mut state = self.shared_state.write();
            std::mem::take(&mut state.runtime.capture_frame_requested)
        };
        if !requested {
            return;
        }

        let Some(frame) = self.latest_frame.clone() else {
            self.shared_state
                .write()
                .runtime
                .set_error("No camera frame available to capture");
            return;
        };
        let Some(image) = frame.to_image() else {
            self.shared_state
                .write()
                .runtime
                .set_error("Captured frame could not be decoded");
            return;
        };

        match storage::save_capture(&image) {
            Ok(path) => {
                info!("Captured frame saved to {:?}", path);
                self.ui_state.review.set_pending(image, path);
                if self.shared_state.read().config.general.auto_review {
                    self.ui_state.current_view = View::Review;
                }
            }
            Err(e) => {
                error!("Saving capture failed: {}", e);
                self.shared_state
                    .write()
                    .runtime
                    .set_error(format!("Could not save capture: {e}"));
            }
        }
    }

    /// Handle a file picked in the capture view: decode it, copy it into
    /// the captures directory, and move it into review.
    fn process_pending_file(&mut self) {
        let picked = self.shared_state.write().runtime.pending_file.take();
        let Some(source) = picked else {
            return;
        };

        let image = match image::open(&source) {
            Ok(img) => img.to_rgb8(),
            Err(e) => {
                error!("Could not decode {:?}: {}", source, e);
                self.shared_state
                    .write()
                    .runtime
                    .set_error(format!("Could not read image file: {e}"));
                return;
            }
        };

        match storage::save_upload_copy(&source) {
            Ok(path) => {
                info!("Picked file copied to {:?}", path);
                self.ui_state.review.set_pending(image, path);
                if self.shared_state.read().config.general.auto_review {
                    self.ui_state.current_view = View::Review;
                }
            }
            Err(e) => {
                error!("Copying picked file failed: {}", e);
                self.shared_state
                    .write()
                    .runtime
                    .set_error(format!("Could not copy file: {e}"));
            }
        }
    }

    /// Act on the Process / Discard / Send buttons from the review view.
    fn process_review_requests(&mut self) {
        let review = &mut self.ui_state.review;

        if std::mem::take(&mut review.process_requested) {
            if let ReviewStage::Pending { .. } = review.stage {
                let ReviewStage::Pending { image, source_path } =
                    std::mem::take(&mut review.stage)
                else {
                    unreachable!()
                };
                let ocr_config = self.shared_state.read().config.ocr.clone();
                self.coordinator
                    .spawn_scan(image, source_path.clone(), ocr_config);
                review.stage = ReviewStage::Scanning { source_path };
                self.shared_state.write().runtime.is_scanning = true;
            }
        }

        if std::mem::take(&mut review.discard_requested) {
            let source_path = match &review.stage {
                ReviewStage::Pending { source_path, .. }
                | ReviewStage::Scanned { source_path, .. } => Some(source_path.clone()),
                _ => None,
            };
            if let Some(path) = source_path {
                if let Err(e) = storage::discard_capture(&path) {
                    warn!("Discard failed: {}", e);
                }
                review.reset();
            }
        }

        if std::mem::take(&mut review.send_requested) {
            if let ReviewStage::Scanned { scan, .. } = &review.stage {
                let (Some(cnp), Some(series)) = (scan.fields.cnp.clone(), scan.fields.series.clone())
                else {
                    return;
                };
                let ReviewStage::Scanned { scan, source_path } = std::mem::take(&mut review.stage)
                else {
                    unreachable!()
                };
                let upload_config = self.shared_state.read().config.upload.clone();
                self.coordinator
                    .spawn_upload(cnp, series, scan.crop.clone(), upload_config);
                review.stage = ReviewStage::Uploading { scan, source_path };
                self.shared_state.write().runtime.is_uploading = true;
            }
        }
    }

    /// Fold finished worker events back into the UI and shared state.
    fn process_worker_events(&mut self) {
        while let Some(event) = self.coordinator.try_recv() {
            match event {
                WorkerEvent::ScanFinished { scan, source_path } => {
                    let summary = match (&scan.fields.cnp, &scan.fields.series) {
                        (Some(_), Some(_)) => "Both fields found".to_string(),
                        (Some(_), None) => "CNP only".to_string(),
                        (None, Some(_)) => "Series only".to_string(),
                        (None, None) => "No fields found".to_string(),
                    };
                    {
                        let mut state = self.shared_state.write();
                        state.runtime.is_scanning = false;
                        state.runtime.last_scan_summary = Some(summary);
                    }
                    self.ui_state.review.crop_texture = None;
                    self.ui_state.review.stage = ReviewStage::Scanned { scan, source_path };
                }
                WorkerEvent::ScanFailed { error, source_path } => {
                    {
                        let mut state = self.shared_state.write();
                        state.runtime.is_scanning = false;
                        state.runtime.set_error(format!("Scan failed: {error}"));
                    }
                    // The saved copy stays so the user can retry from review
                    let image = image::open(&source_path).ok().map(|i| i.to_rgb8());
                    match image {
                        Some(image) => {
                            self.ui_state.review.set_pending(image, source_path);
                        }
                        None => self.ui_state.review.reset(),
                    }
                }
                WorkerEvent::UploadDone(outcome) => {
                    self.shared_state.write().runtime.is_uploading = false;
                    let stage = std::mem::take(&mut self.ui_state.review.stage);
                    if outcome.success {
                        if let ReviewStage::Uploading { source_path, .. } = stage {
                            let keep = self.shared_state.read().config.general.keep_uploaded_files;
                            if !keep {
                                if let Err(e) = storage::discard_capture(&source_path) {
                                    warn!("Could not remove uploaded capture: {}", e);
                                }
                            }
                        }
                        self.ui_state.review.reset();
                    } else if let ReviewStage::Uploading { scan, source_path } = stage {
                        // Failed upload keeps the results on screen for a retry
                        self.ui_state.review.stage = ReviewStage::Scanned { scan, source_path };
                    }
                    self.ui_state.review.last_outcome = Some(outcome);
                }
                WorkerEvent::UploadFailed(error) => {
                    {
                        let mut state = self.shared_state.write();
                        state.runtime.is_uploading = false;
                        state.runtime.set_error(format!("Upload failed: {error}"));
                    }
                    let stage = std::mem::take(&mut self.ui_state.review.stage);
                    if let ReviewStage::Uploading { scan, source_path } = stage {
                        self.ui_state.review.stage = ReviewStage::Scanned { scan, source_path };
                    }
                }
            }
        }
    }
}

impl eframe::App for DocScanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        self.process_camera_command();
        self.pump_camera();
        self.process_capture_request();
        self.process_pending_file();
        self.process_review_requests();
        self.process_worker_events();

        egui::SidePanel::left("sidebar")
            .exact_width(180.0)
            .resizable(false)
            .show(ctx, |ui| {
                widgets::render_sidebar(ui, &mut self.ui_state.current_view);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::none()
                .inner_margin(egui::Margin::same(16.0))
                .show(ui, |ui| match self.ui_state.current_view {
                    View::Home => views::render_home_view(
                        ui,
                        &mut self.ui_state.current_view,
                        &self.shared_state,
                    ),
                    View::Capture => views::render_capture_view(
                        ui,
                        &mut self.ui_state.capture,
                        &self.shared_state,
                        self.latest_frame.as_ref(),
                    ),
                    View::Review => views::render_review_view(
                        ui,
                        &mut self.ui_state.review,
                        &self.shared_state,
                    ),
                    View::Settings => views::render_settings_view(
                        ui,
                        &mut self.ui_state.settings,
                        &self.shared_state,
                    ),
                });
        });

        // Keep painting while anything is moving in the background
        let busy = {
            let state = self.shared_state.read();
            state.runtime.is_camera_running || state.runtime.is_scanning || state.runtime.is_uploading
        };
        if busy {
            ctx.request_repaint();
        }
    }
}

/// Launch the window and block until it is closed.
pub fn run_app(shared_state: Arc<RwLock<SharedAppState>>) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([860.0, 560.0])
            .with_title("DocScan"),
        ..Default::default()
    };

    eframe::run_native(
        "DocScan",
        options,
        Box::new(move |_cc| Ok(Box::new(DocScanApp::new(shared_state)))),
    )
    .map_err(|e| anyhow::anyhow!("Window error: {e}"))
}
