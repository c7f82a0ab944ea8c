//! Home view - status overview and quick actions

use egui::RichText;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::shared::{CameraCommand, SharedAppState};
use crate::ui::state::View;
use crate::ui::theme::ThemeColors;
use crate::ui::widgets::{status_card, CardStatus};

/// Render the home view
pub fn render_home_view(
    ui: &mut egui::Ui,
    current_view: &mut View,
    shared_state: &Arc<RwLock<SharedAppState>>,
) {
    ui.heading(RichText::new("Document Scanner").size(24.0).strong());
    ui.add_space(8.0);
    ui.label(
        RichText::new("Photograph or upload an identity document, review the extracted fields, and send them to the server")
            .size(14.0)
            .color(ThemeColors::TEXT_SECONDARY),
    );

    ui.add_space(24.0);

    let (camera_running, busy, last_scan, server_url, last_error) = {
        let state = shared_state.read();
        (
            state.runtime.is_camera_running,
            state.runtime.is_scanning || state.runtime.is_uploading,
            state.runtime.last_scan_summary.clone(),
            state.config.upload.server_url.clone(),
            state.runtime.last_error.clone(),
        )
    };

    ui.horizontal(|ui| {
        let camera_status = if camera_running {
            CardStatus::Active
        } else {
            CardStatus::Inactive
        };
        let camera_value = if camera_running { "Streaming" } else { "Off" };
        status_card(ui, "Camera", camera_value, camera_status);

        ui.add_space(12.0);

        let scan_status = if busy {
            CardStatus::Busy
        } else if last_error.is_some() {
            CardStatus::Error
        } else if last_scan.is_some() {
            CardStatus::Active
        } else {
            CardStatus::Inactive
        };
        let scan_value = if busy {
            "Working...".to_string()
        } else {
            last_scan.unwrap_or_else(|| "No scans yet".to_string())
        };
        status_card(ui, "Last Scan", &scan_value, scan_status);

        ui.add_space(12.0);

        status_card(ui, "Server", &server_url, CardStatus::Inactive);
    });

    if let Some(error) = last_error {
        ui.add_space(16.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("!").color(ThemeColors::ACCENT_ERROR).strong());
            ui.label(RichText::new(&error).color(ThemeColors::ACCENT_ERROR));
            if ui.small_button("Dismiss").clicked() {
                shared_state.write().runtime.clear_error();
            }
        });
    }

    ui.add_space(32.0);
    ui.heading(RichText::new("Quick Actions").size(18.0));
    ui.add_space(12.0);

    ui.horizontal(|ui| {
        if ui
            .add(
                egui::Button::new(RichText::new("Open Camera").color(egui::Color32::WHITE))
                    .fill(ThemeColors::ACCENT_SUCCESS)
                    .min_size(egui::vec2(130.0, 34.0)),
            )
            .clicked()
        {
            shared_state.write().runtime.camera_command = Some(CameraCommand::Start);
            *current_view = View::Capture;
        }

        ui.add_space(8.0);

        if ui
            .add(
                egui::Button::new(RichText::new("Review").color(egui::Color32::WHITE))
                    .fill(ThemeColors::ACCENT_PRIMARY)
                    .min_size(egui::vec2(130.0, 34.0)),
            )
            .clicked()
        {
            *current_view = View::Review;
        }

        ui.add_space(8.0);

        // Server UI in the system browser, same host as the upload endpoint
        let base_url = server_base(&server_url);
        ui.hyperlink_to("Open server in browser", base_url);
    });
}

/// Strip the API path from the upload URL, keeping scheme and host.
fn server_base(url: &str) -> String {
    match url.find("//") {
        Some(scheme_end) => {
            let host_start = scheme_end + 2;
            match url[host_start..].find('/') {
                Some(path_start) => url[..host_start + path_start].to_string(),
                None => url.to_string(),
            }
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_base_strips_path() {
        assert_eq!(
            server_base("https://192.168.0.102/api/receive-data/"),
            "https://192.168.0.102"
        );
    }

    #[test]
    fn test_server_base_bare_host() {
        assert_eq!(server_base("https://example.test"), "https://example.test");
    }
}
