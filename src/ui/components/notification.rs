//! Notification banner

use crate::ui::surface::NotificationView;
use crate::ui::theme::Theme;
use egui::{self, Align2, RichText, Vec2};

pub struct NotificationBanner<'a> {
    view: &'a NotificationView,
    theme: &'a Theme,
}

impl<'a> NotificationBanner<'a> {
    pub fn new(view: &'a NotificationView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }

    pub fn show(self, ctx: &egui::Context) {
        let alpha = self.view.opacity.clamp(0.0, 1.0);

        egui::Area::new(egui::Id::new("notification_banner"))
            .anchor(Align2::CENTER_TOP, Vec2::new(0.0, 56.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(self.theme.bg_secondary.gamma_multiply(alpha))
                    .stroke(egui::Stroke::new(1.0, self.theme.alert.gamma_multiply(alpha)))
                    .rounding(self.theme.card_rounding)
                    .inner_margin(egui::Margin::symmetric(16.0, 8.0))
                    .show(ui, |ui| {
                        let response = ui.label(
                            RichText::new(&self.view.text)
                                .family(egui::FontFamily::Monospace)
                                .color(self.theme.alert.gamma_multiply(alpha)),
                        );
                        response.widget_info(|| {
                            egui::WidgetInfo::labeled(
                                egui::WidgetType::Label,
                                true,
                                &self.view.text,
                            )
                        });
                    });
            });

        if alpha < 1.0 {
            ctx.request_repaint();
        }
    }
}
