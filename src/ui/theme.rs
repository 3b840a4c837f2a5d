//! Colors and visuals for the dark and light themes

use eframe::egui::{self, Color32, CornerRadius, Margin, Stroke};

use crate::core::config::Theme;

pub const PRIMARY: Color32 = Color32::from_rgb(0x6C, 0x63, 0xFF);
pub const SECONDARY: Color32 = Color32::from_rgb(0xFF, 0x65, 0x84);
pub const SUCCESS: Color32 = Color32::from_rgb(0x4C, 0xAF, 0x50);
pub const WARNING: Color32 = Color32::from_rgb(0xFF, 0xB3, 0x47);

const DARK_BG: Color32 = Color32::from_rgb(0x12, 0x12, 0x12);
const DARK_TEXT: Color32 = Color32::from_rgb(0xE0, 0xE0, 0xE0);
const DARK_CARD: Color32 = Color32::from_rgb(0x1E, 0x1E, 0x1E);
const DARK_BORDER: Color32 = Color32::from_rgb(0x2E, 0x2E, 0x2E);

const LIGHT_CARD: Color32 = Color32::from_rgb(0xF7, 0xF7, 0xFB);
const LIGHT_BORDER: Color32 = Color32::from_rgb(0xDD, 0xDD, 0xE6);

/// Install the visuals for `theme`
pub fn apply(ctx: &egui::Context, theme: Theme) {
    let mut visuals = match theme {
        Theme::Dark => {
            let mut visuals = egui::Visuals::dark();
            visuals.panel_fill = DARK_BG;
            visuals.window_fill = DARK_CARD;
            visuals.extreme_bg_color = DARK_CARD;
            visuals.override_text_color = Some(DARK_TEXT);
            visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, DARK_BORDER);
            visuals
        }
        Theme::Light => egui::Visuals::light(),
    };
    visuals.selection.bg_fill = PRIMARY;
    visuals.hyperlink_color = SECONDARY;

    ctx.set_visuals(visuals);
}

/// Rounded, bordered frame used for content cards
pub fn card(ui: &egui::Ui) -> egui::Frame {
    let (fill, border) = if ui.visuals().dark_mode {
        (DARK_CARD, DARK_BORDER)
    } else {
        (LIGHT_CARD, LIGHT_BORDER)
    };

    egui::Frame::new()
        .fill(fill)
        .stroke(Stroke::new(1.0, border))
        .corner_radius(CornerRadius::same(16))
        .inner_margin(Margin::same(24))
        .outer_margin(Margin::symmetric(0, 8))
}
