//! Command input bar
//!
//! Text entry, send button and the microphone toggle. The bar only edits the
//! input buffer; submitting and listening are reported back as actions.

use crate::ui::surface::Surface;
use crate::ui::theme::Theme;
use crate::ui::UiAction;
use egui::{self, Key, RichText, Vec2};

pub struct InputBar<'a> {
    surface: &'a mut Surface,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(surface: &'a mut Surface, theme: &'a Theme) -> Self {
        Self { surface, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if self.show_mic_button(ui) {
                        actions.push(UiAction::ToggleListening);
                    }

                    let available_width = ui.available_width() - 80.0;
                    let text_edit = egui::TextEdit::singleline(&mut self.surface.input)
                        .hint_text("Enter command...")
                        .desired_width(available_width.max(80.0))
                        .id(egui::Id::new("command_input"));

                    let response = ui.add(text_edit);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Command input")
                    });

                    if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                        actions.push(UiAction::Submit);
                        response.request_focus();
                    }

                    let can_send = !self.surface.input.trim().is_empty();
                    let send = egui::Button::new(RichText::new("SEND").color(self.theme.accent))
                        .rounding(self.theme.button_rounding);
                    let send_response = ui.add_enabled(can_send, send);
                    send_response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Button, can_send, "Send command")
                    });
                    if send_response.clicked() {
                        actions.push(UiAction::Submit);
                    }
                });
            });

        actions
    }

    /// Returns true when clicked.
    fn show_mic_button(&self, ui: &mut egui::Ui) -> bool {
        let voice = self.surface.voice;
        let (icon, color, tooltip) = if !voice.available {
            ("🎤", self.theme.text_muted, "Voice input unavailable")
        } else if voice.listening {
            ("⏹", self.theme.alert, "Stop listening")
        } else {
            ("🎤", self.theme.accent, "Start listening")
        };

        let mut button = egui::Button::new(RichText::new(icon).size(18.0).color(color))
            .min_size(Vec2::splat(36.0))
            .rounding(self.theme.button_rounding);
        if voice.listening {
            button = button.fill(self.theme.alert.gamma_multiply(0.2));
        }

        let response = ui.add_enabled(voice.available, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(
                egui::WidgetType::Button,
                voice.available,
                "Toggle voice input",
            )
        });
        let clicked = response.clicked();
        response.on_hover_text(tooltip);

        if voice.listening {
            ui.ctx().request_repaint();
        }
        clicked
    }
}
