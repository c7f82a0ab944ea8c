//! Reusable UI components: sidebar navigation and status cards

use egui::{RichText, Rounding};

use crate::ui::state::View;
use crate::ui::theme::ThemeColors;

/// Render the sidebar navigation
pub fn render_sidebar(ui: &mut egui::Ui, current_view: &mut View) {
    ui.vertical(|ui| {
        ui.add_space(16.0);

        ui.horizontal(|ui| {
            ui.add_space(12.0);
            ui.label(
                RichText::new("DocScan")
                    .size(20.0)
                    .color(ThemeColors::ACCENT_PRIMARY)
                    .strong(),
            );
        });
        ui.horizontal(|ui| {
            ui.add_space(12.0);
            ui.label(
                RichText::new("Document OCR")
                    .size(11.0)
                    .color(ThemeColors::TEXT_MUTED),
            );
        });

        ui.add_space(20.0);
        ui.separator();
        ui.add_space(12.0);

        for view in View::all() {
            let is_selected = *current_view == view;
            let label = if is_selected {
                RichText::new(view.name())
                    .color(ThemeColors::ACCENT_PRIMARY)
                    .strong()
            } else {
                RichText::new(view.name()).color(ThemeColors::TEXT_SECONDARY)
            };
            if ui
                .add_sized([ui.available_width() - 16.0, 32.0], egui::SelectableLabel::new(is_selected, label))
                .clicked()
            {
                *current_view = view;
            }
            ui.add_space(2.0);
        }

        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                ui.add_space(12.0);
                ui.label(
                    RichText::new(concat!("v", env!("CARGO_PKG_VERSION")))
                        .size(10.0)
                        .color(ThemeColors::TEXT_MUTED),
                );
            });
            ui.add_space(8.0);
            ui.separator();
        });
    });
}

/// Status kinds for cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Active,
    Inactive,
    Busy,
    Error,
}

impl CardStatus {
    pub fn color(&self) -> egui::Color32 {
        match self {
            CardStatus::Active => ThemeColors::ACCENT_SUCCESS,
            CardStatus::Inactive => ThemeColors::TEXT_MUTED,
            CardStatus::Busy => ThemeColors::ACCENT_WARNING,
            CardStatus::Error => ThemeColors::ACCENT_ERROR,
        }
    }
}

/// Render a card with a title, value, and status dot
pub fn status_card(ui: &mut egui::Ui, title: &str, value: &str, status: CardStatus) {
    egui::Frame::none()
        .fill(ThemeColors::BG_MEDIUM)
        .rounding(Rounding::same(8.0))
        .inner_margin(14.0)
        .show(ui, |ui| {
            ui.set_min_width(170.0);
            ui.horizontal(|ui| {
                let (rect, _) =
                    ui.allocate_exact_size(egui::Vec2::splat(10.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 4.0, status.color());
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(title)
                            .size(12.0)
                            .color(ThemeColors::TEXT_MUTED),
                    );
                    ui.label(
                        RichText::new(value)
                            .size(16.0)
                            .color(ThemeColors::TEXT_PRIMARY)
                            .strong(),
                    );
                });
            });
        });
}
