//! Capture view - camera preview and image intake

use egui::RichText;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;

use crate::capture::frame::CapturedFrame;
use crate::capture::CameraCapture;
use crate::shared::{CameraCommand, SharedAppState};
use crate::ui::state::CaptureViewState;
use crate::ui::theme::ThemeColors;

/// Render the capture view.
///
/// `preview_frame` is the most recent camera frame, grabbed by the app
/// before rendering; the view only turns it into a texture.
pub fn render_capture_view(
    ui: &mut egui::Ui,
    view_state: &mut CaptureViewState,
    shared_state: &Arc<RwLock<SharedAppState>>,
    preview_frame: Option<&CapturedFrame>,
) {
    ui.heading(RichText::new("Capture").size(24.0).strong());
    ui.add_space(8.0);
    ui.label(
        RichText::new("Photograph the document with the camera or pick an image file")
            .size(14.0)
            .color(ThemeColors::TEXT_SECONDARY),
    );

    ui.add_space(20.0);

    // Device list
    ui.horizontal(|ui| {
        if ui.button("Refresh Devices").clicked() || view_state.last_refresh.is_none() {
            view_state.available_devices = CameraCapture::list_devices().unwrap_or_default();
            view_state.last_refresh = Some(Instant::now());
        }
        let device_index = shared_state.read().config.camera.device_index;
        let current = view_state
            .available_devices
            .get(device_index as usize)
            .cloned()
            .unwrap_or_else(|| format!("[{device_index}] (not detected)"));
        ui.label(RichText::new("Device:").color(ThemeColors::TEXT_MUTED));
        ui.label(RichText::new(current).strong());
    });

    ui.add_space(12.0);

    let is_camera_running = shared_state.read().runtime.is_camera_running;

    // Camera controls
    ui.horizontal(|ui| {
        let (btn_text, btn_color, command) = if is_camera_running {
            ("Stop Camera", ThemeColors::ACCENT_ERROR, CameraCommand::Stop)
        } else {
            ("Open Camera", ThemeColors::ACCENT_SUCCESS, CameraCommand::Start)
        };
        if ui
            .add(
                egui::Button::new(RichText::new(btn_text).color(egui::Color32::WHITE))
                    .fill(btn_color)
                    .min_size(egui::vec2(130.0, 34.0)),
            )
            .clicked()
        {
            shared_state.write().runtime.camera_command = Some(command);
        }

        ui.add_space(8.0);

        if ui
            .add_enabled(
                is_camera_running,
                egui::Button::new(RichText::new("Capture Frame").color(egui::Color32::WHITE))
                    .fill(ThemeColors::ACCENT_PRIMARY)
                    .min_size(egui::vec2(130.0, 34.0)),
            )
            .clicked()
        {
            shared_state.write().runtime.capture_frame_requested = true;
        }

        ui.add_space(8.0);

        if ui
            .add(egui::Button::new("Open File...").min_size(egui::vec2(110.0, 34.0)))
            .clicked()
        {
            let picked = rfd::FileDialog::new()
                .add_filter("Image files", &["jpg", "jpeg", "png"])
                .pick_file();
            if let Some(path) = picked {
                shared_state.write().runtime.pending_file = Some(path);
            }
        }
    });

    ui.add_space(16.0);

    // Live preview
    egui::Frame::none()
        .fill(ThemeColors::BG_DARK)
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(8.0)
        .show(ui, |ui| {
            let preview_size = egui::vec2(ui.available_width().min(720.0), 405.0);
            ui.set_min_size(preview_size);

            if let Some(frame) = preview_frame {
                let needs_new_texture = view_state
                    .preview_size
                    .map(|(w, h)| w != frame.width || h != frame.height)
                    .unwrap_or(true)
                    || view_state.preview_texture.is_none();

                let color_image = egui::ColorImage::from_rgb(
                    [frame.width as usize, frame.height as usize],
                    &frame.data,
                );

                if needs_new_texture {
                    let texture = ui.ctx().load_texture(
                        "camera_preview",
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    view_state.preview_texture = Some(texture);
                    view_state.preview_size = Some((frame.width, frame.height));
                } else if let Some(ref mut texture) = view_state.preview_texture {
                    texture.set(color_image, egui::TextureOptions::LINEAR);
                }
            }

            if let Some(ref texture) = view_state.preview_texture {
                let tex_size = texture.size_vec2();
                let scale = (preview_size.x / tex_size.x).min(preview_size.y / tex_size.y);
                ui.centered_and_justified(|ui| {
                    ui.image((texture.id(), tex_size * scale));
                });
            } else {
                ui.centered_and_justified(|ui| {
                    let message = if is_camera_running {
                        "Waiting for first frame..."
                    } else {
                        "Camera is off"
                    };
                    ui.label(
                        RichText::new(message)
                            .size(12.0)
                            .color(ThemeColors::TEXT_MUTED),
                    );
                });
            }
        });

    // Drop the stale texture when the camera is stopped
    if !is_camera_running && preview_frame.is_none() && view_state.preview_texture.is_some() {
        view_state.preview_texture = None;
        view_state.preview_size = None;
    }
}
