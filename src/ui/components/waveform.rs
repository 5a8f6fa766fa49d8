//! Speaking indicator
//!
//! Animated bars while speech is being synthesized, a flat line otherwise.

use crate::ui::theme::Theme;
use egui::{self, Pos2, Stroke, Vec2};

const BARS: usize = 24;

pub struct Waveform<'a> {
    active: bool,
    theme: &'a Theme,
    height: f32,
}

impl<'a> Waveform<'a> {
    pub fn new(active: bool, theme: &'a Theme) -> Self {
        Self {
            active,
            theme,
            height: 32.0,
        }
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let desired = Vec2::new(ui.available_width(), self.height);
        let (rect, response) = ui.allocate_exact_size(desired, egui::Sense::hover());
        let painter = ui.painter();
        let center_y = rect.center().y;

        if !self.active {
            painter.line_segment(
                [
                    Pos2::new(rect.left() + 8.0, center_y),
                    Pos2::new(rect.right() - 8.0, center_y),
                ],
                Stroke::new(1.0, self.theme.accent_dim),
            );
        } else {
            let t = ui.ctx().input(|i| i.time) as f32;
            let step = rect.width() / BARS as f32;
            for i in 0..BARS {
                let phase = t * 8.0 + i as f32 * 0.7;
                let amplitude = (phase.sin() * 0.5 + 0.5) * (0.3 + 0.7 * ((i as f32 * 1.3).sin().abs()));
                let half = (rect.height() / 2.0 - 2.0) * amplitude.max(0.08);
                let x = rect.left() + step * (i as f32 + 0.5);
                painter.line_segment(
                    [Pos2::new(x, center_y - half), Pos2::new(x, center_y + half)],
                    Stroke::new(step * 0.5, self.theme.accent),
                );
            }
            ui.ctx().request_repaint();
        }

        let label = if self.active { "Speaking" } else { "Silent" };
        response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Other, true, label));
        response
    }
}
