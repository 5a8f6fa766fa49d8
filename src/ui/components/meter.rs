//! Horizontal load meter

use crate::telemetry::pipeline::BarView;
use crate::ui::theme::Theme;
use egui::{self, Color32, RichText, Vec2};

pub struct Meter<'a> {
    title: &'a str,
    bar: &'a BarView,
    theme: &'a Theme,
    fill: Option<Color32>,
}

impl<'a> Meter<'a> {
    pub fn new(title: &'a str, bar: &'a BarView, theme: &'a Theme) -> Self {
        Self {
            title,
            bar,
            theme,
            fill: None,
        }
    }

    /// Fixed fill instead of the load band color
    pub fn fill(mut self, color: Color32) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let fill = self
            .fill
            .unwrap_or_else(|| self.theme.load_color(self.bar.load));

        let response = ui
            .horizontal(|ui| {
                ui.add_sized(
                    Vec2::new(48.0, 16.0),
                    egui::Label::new(
                        RichText::new(self.title)
                            .family(egui::FontFamily::Monospace)
                            .color(self.theme.text_secondary),
                    ),
                );

                let width = (ui.available_width() - 64.0).max(40.0);
                let (rect, bar) = ui.allocate_exact_size(Vec2::new(width, 10.0), egui::Sense::hover());
                let painter = ui.painter();
                painter.rect_filled(rect, 2.0, self.theme.bg_tertiary);

                let mut filled = rect;
                filled.set_width(rect.width() * self.bar.width_pct / 100.0);
                painter.rect_filled(filled, 2.0, fill);

                ui.label(
                    RichText::new(&self.bar.label)
                        .family(egui::FontFamily::Monospace)
                        .color(fill),
                );
                bar
            })
            .inner;

        let label = format!("{} {}", self.title, self.bar.label);
        response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label));
        response
    }
}
