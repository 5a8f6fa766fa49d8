//! Debug panel component
//!
//! Dialogue state, capabilities and telemetry poller health.

use crate::coordinator::DialogueState;
use crate::telemetry::PollerStats;
use crate::ui::surface::Surface;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct DebugPanel<'a> {
    surface: &'a Surface,
    dialogue: DialogueState,
    stats: Option<&'a PollerStats>,
    fps: f32,
    theme: &'a Theme,
}

impl<'a> DebugPanel<'a> {
    pub fn new(surface: &'a Surface, dialogue: DialogueState, theme: &'a Theme) -> Self {
        Self {
            surface,
            dialogue,
            stats: None,
            fps: 0.0,
            theme,
        }
    }

    pub fn stats(mut self, stats: &'a PollerStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Debug").strong().color(self.theme.text_primary));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("{:.0} FPS", self.fps))
                                .size(12.0)
                                .family(egui::FontFamily::Monospace)
                                .color(self.theme.text_muted),
                        );
                    });
                });
                ui.separator();

                egui::Grid::new("debug_stats")
                    .num_columns(2)
                    .spacing([20.0, 4.0])
                    .show(ui, |ui| {
                        self.stat_row(ui, "Dialogue", self.dialogue.status());
                        self.stat_row(ui, "Speech output", yes_no(self.surface.speech_available));
                        self.stat_row(ui, "Voice input", yes_no(self.surface.voice.available));
                        self.stat_row(ui, "Messages", &self.surface.chat.len().to_string());
                        self.stat_row(ui, "Frames drawn", &self.surface.telemetry.frames.to_string());

                        if let Some(stats) = self.stats {
                            self.stat_row(ui, "Frames skipped", &stats.frames_skipped.to_string());
                            self.stat_row(ui, "Fetch latency", &stats.fetch_latency.summary());
                        }
                    });

                if let Some(error) = self.stats.and_then(|s| s.last_error.as_ref()) {
                    ui.add_space(self.theme.spacing_sm);
                    ui.horizontal_wrapped(|ui| {
                        ui.label(RichText::new("⚠").color(self.theme.load_high));
                        ui.label(RichText::new(error).size(12.0).color(self.theme.load_high));
                    });
                }
            });
    }

    fn stat_row(&self, ui: &mut egui::Ui, label: &str, value: &str) {
        ui.label(RichText::new(label).color(self.theme.text_muted));
        ui.label(
            RichText::new(value)
                .family(egui::FontFamily::Monospace)
                .color(self.theme.text_secondary),
        );
        ui.end_row();
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "available"
    } else {
        "disabled"
    }
}
