//! Settings view - edit and persist the configuration

use egui::RichText;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use crate::config::save_config;
use crate::shared::SharedAppState;
use crate::storage::get_config_dir;
use crate::ui::state::SettingsViewState;
use crate::ui::theme::ThemeColors;

/// Render the settings view
pub fn render_settings_view(
    ui: &mut egui::Ui,
    view_state: &mut SettingsViewState,
    shared_state: &Arc<RwLock<SharedAppState>>,
) {
    ui.heading(RichText::new("Settings").size(24.0).strong());
    ui.add_space(16.0);

    egui::ScrollArea::vertical().show(ui, |ui| {
        let mut state = shared_state.write();
        let config = &mut state.config;

        section_header(ui, "General");
        ui.checkbox(
            &mut config.general.auto_review,
            "Jump to Review after capturing a frame",
        );
        ui.checkbox(
            &mut config.general.keep_uploaded_files,
            "Keep saved captures after a successful upload",
        );

        ui.add_space(16.0);
        section_header(ui, "Camera");
        ui.horizontal(|ui| {
            ui.label("Device index:");
            ui.add(egui::DragValue::new(&mut config.camera.device_index).range(0..=9));
        });
        ui.horizontal(|ui| {
            ui.label("Resolution:");
            ui.add(
                egui::DragValue::new(&mut config.camera.width)
                    .range(0..=7680)
                    .speed(10),
            );
            ui.label("x");
            ui.add(
                egui::DragValue::new(&mut config.camera.height)
                    .range(0..=4320)
                    .speed(10),
            );
            ui.label(
                RichText::new("(0 x 0 = highest available)")
                    .size(11.0)
                    .color(ThemeColors::TEXT_MUTED),
            );
        });

        ui.add_space(16.0);
        section_header(ui, "OCR");
        ui.horizontal(|ui| {
            ui.label("Language pack:");
            ui.add(egui::TextEdit::singleline(&mut config.ocr.language).desired_width(80.0));
        });
        ui.checkbox(
            &mut config.ocr.preprocessing.enabled,
            "Preprocess the crop before OCR",
        );
        ui.add_enabled_ui(config.ocr.preprocessing.enabled, |ui| {
            ui.indent("ocr_preproc", |ui| {
                ui.checkbox(&mut config.ocr.preprocessing.grayscale, "Grayscale");
                ui.checkbox(&mut config.ocr.preprocessing.invert, "Invert colors");
                ui.horizontal(|ui| {
                    ui.label("Contrast:");
                    ui.add(
                        egui::Slider::new(&mut config.ocr.preprocessing.contrast, 0.5..=3.0)
                            .step_by(0.05),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label("Sharpen:");
                    ui.add(
                        egui::Slider::new(&mut config.ocr.preprocessing.sharpen, 0.0..=2.0)
                            .step_by(0.05),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label("Upscale:");
                    ui.add(egui::Slider::new(&mut config.ocr.preprocessing.scale, 1..=4));
                });
            });
        });

        ui.add_space(16.0);
        section_header(ui, "Upload");
        ui.horizontal(|ui| {
            ui.label("Server URL:");
            ui.add(
                egui::TextEdit::singleline(&mut config.upload.server_url).desired_width(320.0),
            );
        });
        ui.checkbox(
            &mut config.upload.verify_tls,
            "Verify the server's TLS certificate",
        );
        if !config.upload.verify_tls {
            ui.label(
                RichText::new("Certificate checks are off; only use this on a trusted network")
                    .size(11.0)
                    .color(ThemeColors::ACCENT_WARNING),
            );
        }
        ui.horizontal(|ui| {
            ui.label("JPEG quality:");
            ui.add(egui::Slider::new(&mut config.upload.jpeg_quality, 10..=100));
        });
        ui.horizontal(|ui| {
            ui.label("Timeout (seconds):");
            ui.add(egui::DragValue::new(&mut config.upload.timeout_secs).range(1..=600));
        });

        ui.add_space(24.0);

        ui.horizontal(|ui| {
            if ui
                .add(
                    egui::Button::new(RichText::new("Save Settings").color(egui::Color32::WHITE))
                        .fill(ThemeColors::ACCENT_PRIMARY)
                        .min_size(egui::vec2(130.0, 34.0)),
                )
                .clicked()
            {
                let result = get_config_dir()
                    .and_then(|dir| save_config(config, &dir.join("config.toml")));
                match result {
                    Ok(()) => {
                        view_state.saved_at = Some(Instant::now());
                        view_state.save_error = None;
                    }
                    Err(e) => {
                        error!("Failed to save settings: {}", e);
                        view_state.saved_at = None;
                        view_state.save_error = Some(e.to_string());
                    }
                }
            }

            ui.add_space(8.0);

            if ui.button("Reset to Defaults").clicked() {
                *config = crate::config::AppConfig::default();
            }

            if let Some(saved_at) = view_state.saved_at {
                if saved_at.elapsed().as_secs() < 3 {
                    ui.label(
                        RichText::new("Saved")
                            .color(ThemeColors::ACCENT_SUCCESS)
                            .strong(),
                    );
                } else {
                    view_state.saved_at = None;
                }
            }
            if let Some(error) = &view_state.save_error {
                ui.label(
                    RichText::new(format!("Save failed: {error}"))
                        .color(ThemeColors::ACCENT_ERROR),
                );
            }
        });
    });
}

fn section_header(ui: &mut egui::Ui, title: &str) {
    ui.label(
        RichText::new(title)
            .size(16.0)
            .color(ThemeColors::ACCENT_PRIMARY)
            .strong(),
    );
    ui.separator();
    ui.add_space(4.0);
}
