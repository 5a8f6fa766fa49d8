//! Diagnostics and biometrics overlays

use super::meter::Meter;
use crate::ui::surface::{OverlayKind, TelemetryView};
use crate::ui::theme::Theme;
use egui::{self, Align2, RichText, Vec2};

pub struct Overlay<'a> {
    kind: OverlayKind,
    telemetry: &'a TelemetryView,
    theme: &'a Theme,
}

impl<'a> Overlay<'a> {
    pub fn new(kind: OverlayKind, telemetry: &'a TelemetryView, theme: &'a Theme) -> Self {
        Self {
            kind,
            telemetry,
            theme,
        }
    }

    pub fn show(self, ctx: &egui::Context) {
        let (anchor, offset) = match self.kind {
            OverlayKind::Diagnostics => (Align2::RIGHT_TOP, Vec2::new(-16.0, 64.0)),
            OverlayKind::Vitals => (Align2::RIGHT_BOTTOM, Vec2::new(-16.0, -96.0)),
        };

        egui::Window::new(self.kind.title())
            .id(egui::Id::new(("overlay", self.kind)))
            .anchor(anchor, offset)
            .collapsible(false)
            .resizable(false)
            .default_width(280.0)
            .show(ctx, |ui| match self.kind {
                OverlayKind::Diagnostics => self.diagnostics(ui),
                OverlayKind::Vitals => self.vitals(ui),
            });
    }

    fn detail_row(&self, ui: &mut egui::Ui, text: String) {
        ui.label(
            RichText::new(text)
                .size(12.0)
                .family(egui::FontFamily::Monospace)
                .color(self.theme.text_secondary),
        );
    }

    fn diagnostics(&self, ui: &mut egui::Ui) {
        let t = self.telemetry;
        Meter::new("CPU", &t.cpu, self.theme).show(ui);
        Meter::new("RAM", &t.ram, self.theme).show(ui);
        if let Some(usage) = &t.detail.ram_usage {
            self.detail_row(ui, format!("Memory {}", usage));
        }

        ui.separator();
        match &t.gpu {
            Some(gpu) => {
                Meter::new("GPU", &gpu.load, self.theme).show(ui);
                self.detail_row(ui, format!("Temperature {}", gpu.temperature_label));
                if let Some(name) = &t.detail.gpu_name {
                    self.detail_row(ui, name.clone());
                }
                if let Some(memory) = &t.detail.gpu_memory {
                    self.detail_row(ui, format!("VRAM {}", memory));
                }
            }
            None => self.detail_row(ui, "GPU not reported".to_string()),
        }
    }

    fn vitals(&self, ui: &mut egui::Ui) {
        let Some(vitals) = &self.telemetry.vitals else {
            self.detail_row(ui, "No biometric data".to_string());
            return;
        };

        let bpm = ui.label(
            RichText::new(&vitals.bpm_label)
                .size(22.0)
                .family(egui::FontFamily::Monospace)
                .color(self.theme.alert),
        );
        let bpm_label = format!("Heart rate {}", vitals.bpm_label);
        bpm.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &bpm_label));

        Meter::new("SpO2", &vitals.spo2, self.theme)
            .fill(self.theme.accent)
            .show(ui);
        Meter::new("STRESS", &vitals.stress, self.theme).show(ui);
    }
}
