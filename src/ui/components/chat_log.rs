//! Chat log component

use crate::messages::Sender;
use crate::ui::surface::Surface;
use crate::ui::theme::Theme;
use egui::{self, RichText, ScrollArea};

/// Attributed chat lines, newest at the bottom
pub struct ChatLogView<'a> {
    surface: &'a Surface,
    theme: &'a Theme,
}

impl<'a> ChatLogView<'a> {
    pub fn new(surface: &'a Surface, theme: &'a Theme) -> Self {
        Self { surface, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .id_salt("chat_log")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if self.surface.chat.is_empty() {
                    ui.label(RichText::new("Awaiting command...").color(self.theme.text_muted));
                    return;
                }

                for message in self.surface.chat.messages() {
                    let line = message.chat_line(&self.surface.labels);
                    let color = match message.sender {
                        Sender::Operator => self.theme.operator_text,
                        Sender::Assistant => self.theme.assistant_text,
                    };

                    let response = ui.label(
                        RichText::new(&line)
                            .family(egui::FontFamily::Monospace)
                            .color(color),
                    );
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &line)
                    });
                }
            });
    }
}
