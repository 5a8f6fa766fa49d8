//! HUD colors and styling

use crate::telemetry::LoadClass;
use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

#[derive(Clone, Debug)]
pub struct Theme {
    /// Cyan accent used for frames, labels and the graph
    pub accent: Color32,
    pub accent_dim: Color32,

    /// Load band colors
    pub load_low: Color32,
    pub load_med: Color32,
    pub load_high: Color32,

    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Notification banner and listening indicator
    pub alert: Color32,

    pub operator_text: Color32,
    pub assistant_text: Color32,

    pub button_rounding: Rounding,
    pub card_rounding: Rounding,

    pub spacing: f32,
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::hud()
    }
}

impl Theme {
    pub fn hud() -> Self {
        Self {
            accent: Color32::from_rgb(0, 243, 255),
            accent_dim: Color32::from_rgb(0, 110, 120),

            load_low: Color32::from_rgb(0, 243, 255),
            load_med: Color32::from_rgb(255, 190, 0),
            load_high: Color32::from_rgb(255, 42, 42),

            bg_primary: Color32::from_rgb(5, 10, 16),
            bg_secondary: Color32::from_rgb(10, 22, 32),
            bg_tertiary: Color32::from_rgb(18, 38, 52),

            text_primary: Color32::from_rgb(224, 251, 252),
            text_secondary: Color32::from_rgb(160, 210, 215),
            text_muted: Color32::from_rgb(90, 130, 140),

            alert: Color32::from_rgb(255, 170, 0),

            operator_text: Color32::from_rgb(255, 255, 255),
            assistant_text: Color32::from_rgb(0, 243, 255),

            button_rounding: Rounding::same(4.0),
            card_rounding: Rounding::same(6.0),

            spacing: 12.0,
            spacing_sm: 6.0,
        }
    }

    pub fn load_color(&self, load: LoadClass) -> Color32 {
        match load {
            LoadClass::Low => self.load_low,
            LoadClass::Medium => self.load_med,
            LoadClass::High => self.load_high,
        }
    }

    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_tertiary;

        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.inactive.bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.accent);

        visuals.widgets.hovered.bg_fill = self.accent_dim;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.accent;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.bg_primary);

        visuals.selection.bg_fill = self.accent.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.accent_dim);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);
        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(20.0, FontFamily::Monospace),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Monospace,
            FontId::new(13.0, FontFamily::Monospace),
        );
        ctx.set_style(style);
    }
}
