//! CPU history polyline

use crate::telemetry::pipeline::GraphPoint;
use crate::telemetry::LoadClass;
use crate::ui::theme::Theme;
use egui::{self, Pos2, Shape, Stroke, Vec2};

/// Draws pre-projected graph points, scaled from the projection size to the
/// allocated rect.
pub struct LoadGraph<'a> {
    points: &'a [GraphPoint],
    projection: Vec2,
    load: LoadClass,
    theme: &'a Theme,
    height: f32,
}

impl<'a> LoadGraph<'a> {
    pub fn new(points: &'a [GraphPoint], projection: Vec2, load: LoadClass, theme: &'a Theme) -> Self {
        Self {
            points,
            projection,
            load,
            theme,
            height: 80.0,
        }
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let size = Vec2::new(ui.available_width(), self.height);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter();

        painter.rect_filled(rect, self.theme.card_rounding, self.theme.bg_secondary);
        for fraction in [0.5, 0.8] {
            let y = rect.bottom() - rect.height() * fraction;
            painter.line_segment(
                [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
                Stroke::new(0.5, self.theme.accent_dim),
            );
        }

        if self.points.len() >= 2 && self.projection.x > 0.0 && self.projection.y > 0.0 {
            let sx = rect.width() / self.projection.x;
            let sy = rect.height() / self.projection.y;
            let line: Vec<Pos2> = self
                .points
                .iter()
                .map(|p| Pos2::new(rect.left() + p.x * sx, rect.top() + p.y * sy))
                .collect();
            painter.add(Shape::line(
                line,
                Stroke::new(1.5, self.theme.load_color(self.load)),
            ));
        }

        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Other, true, "CPU history graph")
        });
        response
    }
}
