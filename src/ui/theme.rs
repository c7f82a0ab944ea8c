//! Window theme and styling
//!
//! Dark neutral theme for the scanner window.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

/// Color palette
pub struct ThemeColors;

impl ThemeColors {
    // Background colors
    pub const BG_DARK: Color32 = Color32::from_rgb(22, 24, 28);
    pub const BG_MEDIUM: Color32 = Color32::from_rgb(32, 34, 40);
    pub const BG_LIGHT: Color32 = Color32::from_rgb(44, 46, 54);
    pub const BG_HOVER: Color32 = Color32::from_rgb(54, 57, 66);

    // Accent colors
    pub const ACCENT_PRIMARY: Color32 = Color32::from_rgb(64, 156, 255);
    pub const ACCENT_SUCCESS: Color32 = Color32::from_rgb(52, 199, 89);
    pub const ACCENT_WARNING: Color32 = Color32::from_rgb(255, 204, 0);
    pub const ACCENT_ERROR: Color32 = Color32::from_rgb(255, 69, 58);

    // Text colors
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(236, 237, 240);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(156, 160, 170);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(104, 108, 118);

    // Border colors
    pub const BORDER: Color32 = Color32::from_rgb(52, 55, 64);
}

/// Apply the theme to egui
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let mut visuals = Visuals::dark();

    visuals.window_fill = ThemeColors::BG_MEDIUM;
    visuals.panel_fill = ThemeColors::BG_DARK;
    visuals.faint_bg_color = ThemeColors::BG_LIGHT;
    visuals.extreme_bg_color = ThemeColors::BG_DARK;

    visuals.widgets.noninteractive.bg_fill = ThemeColors::BG_MEDIUM;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, ThemeColors::TEXT_SECONDARY);
    visuals.widgets.noninteractive.rounding = Rounding::same(6.0);

    visuals.widgets.inactive.bg_fill = ThemeColors::BG_LIGHT;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, ThemeColors::TEXT_PRIMARY);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);

    visuals.widgets.hovered.bg_fill = ThemeColors::BG_HOVER;
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, ThemeColors::TEXT_PRIMARY);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);

    visuals.widgets.active.bg_fill = ThemeColors::ACCENT_PRIMARY;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, ThemeColors::TEXT_PRIMARY);
    visuals.widgets.active.rounding = Rounding::same(6.0);

    visuals.selection.bg_fill = color_with_alpha(ThemeColors::ACCENT_PRIMARY, 77);
    visuals.selection.stroke = Stroke::new(1.0, ThemeColors::ACCENT_PRIMARY);

    visuals.hyperlink_color = ThemeColors::ACCENT_PRIMARY;

    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, ThemeColors::BORDER);

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(16.0);

    style.text_styles = [
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(15.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(15.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(21.0, FontFamily::Proportional)),
    ]
    .into();

    ctx.set_style(style);
}

/// Helper to create a color with modified alpha
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}
