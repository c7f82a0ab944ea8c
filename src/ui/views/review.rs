//! Review view - staged workflow from accepted image to upload

use egui::{RichText, TextureHandle};
use image::RgbImage;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::shared::SharedAppState;
use crate::ui::state::{ReviewStage, ReviewViewState};
use crate::ui::theme::ThemeColors;
use crate::vision::DocumentScan;

/// Render the review view
pub fn render_review_view(
    ui: &mut egui::Ui,
    view_state: &mut ReviewViewState,
    _shared_state: &Arc<RwLock<SharedAppState>>,
) {
    ui.heading(RichText::new("Review").size(24.0).strong());
    ui.add_space(8.0);

    // Outcome banner from the last upload attempt
    let mut dismiss_outcome = false;
    if let Some(outcome) = &view_state.last_outcome {
        let color = if outcome.success {
            ThemeColors::ACCENT_SUCCESS
        } else {
            ThemeColors::ACCENT_ERROR
        };
        ui.horizontal(|ui| {
            ui.label(RichText::new(&outcome.message).color(color));
            if ui.small_button("Dismiss").clicked() {
                dismiss_outcome = true;
            }
        });
        ui.add_space(8.0);
    }
    if dismiss_outcome {
        view_state.last_outcome = None;
    }

    // Borrowing the stage and the texture slots separately keeps the
    // render paths clone-free even for large crops
    match &view_state.stage {
        ReviewStage::Empty => {
            ui.label(
                RichText::new("Nothing to review. Capture a frame or open a file first.")
                    .color(ThemeColors::TEXT_MUTED),
            );
        }
        ReviewStage::Pending { image, .. } => {
            render_pending(
                ui,
                image,
                &mut view_state.preview_texture,
                &mut view_state.process_requested,
                &mut view_state.discard_requested,
            );
        }
        ReviewStage::Scanning { .. } => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Processing... Please wait.");
            });
        }
        ReviewStage::Scanned { scan, .. } => {
            render_scanned(
                ui,
                scan,
                &mut view_state.crop_texture,
                &mut view_state.send_requested,
                &mut view_state.discard_requested,
                false,
            );
        }
        ReviewStage::Uploading { scan, .. } => {
            render_scanned(
                ui,
                scan,
                &mut view_state.crop_texture,
                &mut view_state.send_requested,
                &mut view_state.discard_requested,
                true,
            );
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Uploading...");
            });
        }
    }
}

/// Pending image: preview plus Process / Discard.
fn render_pending(
    ui: &mut egui::Ui,
    image: &RgbImage,
    preview_texture: &mut Option<TextureHandle>,
    process_requested: &mut bool,
    discard_requested: &mut bool,
) {
    ui.label(
        RichText::new("Check the image, then run OCR or discard it")
            .size(14.0)
            .color(ThemeColors::TEXT_SECONDARY),
    );
    ui.add_space(12.0);

    show_image(ui, preview_texture, "review_preview", image, 520.0);

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui
            .add(
                egui::Button::new(RichText::new("Process").color(egui::Color32::WHITE))
                    .fill(ThemeColors::ACCENT_PRIMARY)
                    .min_size(egui::vec2(120.0, 34.0)),
            )
            .clicked()
        {
            *process_requested = true;
        }
        ui.add_space(8.0);
        if ui
            .add(
                egui::Button::new(RichText::new("Discard").color(egui::Color32::WHITE))
                    .fill(ThemeColors::ACCENT_ERROR)
                    .min_size(egui::vec2(120.0, 34.0)),
            )
            .clicked()
        {
            *discard_requested = true;
        }
    });
}

/// Scan results: crop, fields, Send / Discard.
fn render_scanned(
    ui: &mut egui::Ui,
    scan: &DocumentScan,
    crop_texture: &mut Option<TextureHandle>,
    send_requested: &mut bool,
    discard_requested: &mut bool,
    uploading: bool,
) {
    ui.label(
        RichText::new(format!("Scan finished in {} ms", scan.processing_time_ms))
            .size(13.0)
            .color(ThemeColors::TEXT_MUTED),
    );
    ui.add_space(12.0);

    show_image(ui, crop_texture, "review_crop", &scan.crop, 420.0);

    ui.add_space(12.0);

    field_row(ui, "CNP", scan.fields.cnp.as_deref());
    field_row(ui, "Series", scan.fields.series.as_deref());

    ui.add_space(8.0);
    egui::CollapsingHeader::new("Raw OCR text")
        .default_open(false)
        .show(ui, |ui| {
            ui.label(RichText::new(&scan.ocr_text).monospace().size(12.0));
        });

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        let can_send = scan.fields.is_complete() && !uploading;
        if ui
            .add_enabled(
                can_send,
                egui::Button::new(RichText::new("Send to Server").color(egui::Color32::WHITE))
                    .fill(ThemeColors::ACCENT_SUCCESS)
                    .min_size(egui::vec2(140.0, 34.0)),
            )
            .clicked()
        {
            *send_requested = true;
        }
        ui.add_space(8.0);
        if ui
            .add_enabled(
                !uploading,
                egui::Button::new(RichText::new("Discard").color(egui::Color32::WHITE))
                    .fill(ThemeColors::ACCENT_ERROR)
                    .min_size(egui::vec2(120.0, 34.0)),
            )
            .clicked()
        {
            *discard_requested = true;
        }
    });

    if !scan.fields.is_complete() {
        ui.add_space(4.0);
        ui.label(
            RichText::new("Upload needs both fields; retake the photo or try another image")
                .size(12.0)
                .color(ThemeColors::ACCENT_WARNING),
        );
    }
}

/// One extracted field with a Not Found fallback.
fn field_row(ui: &mut egui::Ui, label: &str, value: Option<&str>) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(format!("{label}:"))
                .color(ThemeColors::TEXT_MUTED)
                .size(14.0),
        );
        match value {
            Some(v) => {
                ui.label(RichText::new(v).strong().monospace().size(15.0));
            }
            None => {
                ui.label(
                    RichText::new("Not found")
                        .color(ThemeColors::ACCENT_ERROR)
                        .size(14.0),
                );
            }
        }
    });
}

/// Render an image through a cached texture slot, scaled to fit.
fn show_image(
    ui: &mut egui::Ui,
    slot: &mut Option<TextureHandle>,
    name: &str,
    image: &RgbImage,
    max_extent: f32,
) {
    if slot.is_none() {
        let color_image = egui::ColorImage::from_rgb(
            [image.width() as usize, image.height() as usize],
            image.as_raw(),
        );
        *slot = Some(
            ui.ctx()
                .load_texture(name, color_image, egui::TextureOptions::LINEAR),
        );
    }

    if let Some(texture) = slot {
        let tex_size = texture.size_vec2();
        let scale = (max_extent / tex_size.x).min(max_extent / tex_size.y).min(1.0);
        egui::Frame::none()
            .fill(ThemeColors::BG_DARK)
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.image((texture.id(), tex_size * scale));
            });
    }
}
