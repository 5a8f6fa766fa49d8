//! Main application struct and eframe integration

use crate::coordinator::Coordinator;
use crate::integration::{HudConfig, Orchestrator, OrchestratorHandle};
use crate::telemetry::{PollerStats, SharedPollerStats};
use crate::ui::components::{
    ChatLogView, DebugPanel, InputBar, LoadGraph, Meter, NotificationBanner, Overlay, Waveform,
};
use crate::ui::surface::{OverlayKind, SharedSurface, Surface};
use crate::ui::theme::Theme;
use crate::ui::UiAction;
use crate::utils::{FpsCounter, Repaint};
use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel, Vec2};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Idle repaint cadence so notifications fade without other input
const IDLE_REPAINT: Duration = Duration::from_millis(100);

pub struct HudApp {
    surface: SharedSurface,
    coordinator: Coordinator,
    theme: Theme,
    handle: Option<OrchestratorHandle>,
    poller_stats: Option<SharedPollerStats>,
    graph_projection: Vec2,
    fps: FpsCounter,
    show_debug_panel: bool,
}

impl HudApp {
    /// Build the app and start every background service.
    pub fn new(cc: &eframe::CreationContext<'_>, config: HudConfig) -> crate::Result<Self> {
        let theme = Theme::hud();
        theme.apply(&cc.egui_ctx);

        let surface = SharedSurface::new(
            Surface::new()
                .with_labels(config.ui.labels())
                .with_notification_timing(config.ui.notification_timing()),
        );

        let ctx = cc.egui_ctx.clone();
        let repaint: Repaint = Arc::new(move || ctx.request_repaint());

        let (handle, coordinator) = Orchestrator::start(&config, surface.clone(), repaint)?;
        info!("HUD online, backend {}", handle.backend_url());

        let poller_stats = Some(handle.poller_stats());
        let mut app = Self::from_parts(surface, coordinator, theme)
            .with_graph_projection(config.telemetry.graph_width, config.telemetry.graph_height);
        app.handle = Some(handle);
        app.poller_stats = poller_stats;
        Ok(app)
    }

    /// Assemble an app around an already wired coordinator. No background
    /// services are started.
    pub fn from_parts(surface: SharedSurface, coordinator: Coordinator, theme: Theme) -> Self {
        Self {
            surface,
            coordinator,
            theme,
            handle: None,
            poller_stats: None,
            graph_projection: Vec2::new(300.0, 100.0),
            fps: FpsCounter::new(),
            show_debug_panel: false,
        }
    }

    /// Size the telemetry pipeline projects graph points into
    pub fn with_graph_projection(mut self, width: f32, height: f32) -> Self {
        self.graph_projection = Vec2::new(width, height);
        self
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut Coordinator {
        &mut self.coordinator
    }

    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }

    pub fn show_debug_panel(&self) -> bool {
        self.show_debug_panel
    }

    /// Draw one frame, then act on whatever the operator did during it.
    pub fn frame(&mut self, ctx: &egui::Context) {
        self.fps.tick(Instant::now());
        self.coordinator.poll_events();

        let dialogue = self.coordinator.dialogue();
        let stats: Option<PollerStats> = self.poller_stats.as_ref().map(|s| s.lock().clone());
        let mut actions = Vec::new();

        {
            let mut surface = self.surface.write();
            let now = Instant::now();
            surface.expire_notification(now);

            if self.show_header(ctx, &surface) {
                actions.push(UiAction::ToggleDebug);
            }

            if self.show_debug_panel {
                SidePanel::right("debug_panel")
                    .resizable(true)
                    .default_width(280.0)
                    .frame(
                        egui::Frame::none()
                            .fill(self.theme.bg_primary)
                            .inner_margin(self.theme.spacing),
                    )
                    .show(ctx, |ui| {
                        let mut panel = DebugPanel::new(&surface, dialogue, &self.theme)
                            .fps(self.fps.fps());
                        if let Some(stats) = stats.as_ref() {
                            panel = panel.stats(stats);
                        }
                        panel.show(ui);
                        if let Some(handle) = self.handle.as_ref() {
                            ui.add_space(self.theme.spacing_sm);
                            ui.label(
                                RichText::new(handle.backend_url())
                                    .size(11.0)
                                    .family(egui::FontFamily::Monospace)
                                    .color(self.theme.text_muted),
                            );
                        }
                    });
            }

            self.show_telemetry(ctx, &surface);

            TopBottomPanel::bottom("input_area")
                .frame(
                    egui::Frame::none()
                        .fill(self.theme.bg_primary)
                        .inner_margin(self.theme.spacing),
                )
                .show(ctx, |ui| {
                    Waveform::new(surface.waveform_active, &self.theme)
                        .height(28.0)
                        .show(ui);
                    ui.add_space(self.theme.spacing_sm);
                    actions.extend(InputBar::new(&mut surface, &self.theme).show(ui));
                });

            CentralPanel::default()
                .frame(
                    egui::Frame::none()
                        .fill(self.theme.bg_primary)
                        .inner_margin(self.theme.spacing),
                )
                .show(ctx, |ui| {
                    ChatLogView::new(&surface, &self.theme).show(ui);
                });

            for kind in OverlayKind::ALL {
                if surface.overlay_visible(kind) {
                    Overlay::new(kind, &surface.telemetry, &self.theme).show(ctx);
                }
            }

            if let Some(view) = surface.notification_at(now) {
                NotificationBanner::new(&view, &self.theme).show(ctx);
            }
        }

        for action in actions {
            self.apply(action);
        }

        ctx.request_repaint_after(IDLE_REPAINT);
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Submit => {
                self.coordinator.submit_input();
            }
            UiAction::ToggleListening => {
                self.coordinator.toggle_listening();
            }
            UiAction::ToggleDebug => self.show_debug_panel = !self.show_debug_panel,
        }
    }

    /// Returns true when the debug toggle was clicked.
    fn show_header(&self, ctx: &egui::Context, surface: &Surface) -> bool {
        let mut toggled = false;
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(surface.labels.assistant.as_str())
                            .size(20.0)
                            .strong()
                            .color(self.theme.accent),
                    );
                    ui.label(
                        RichText::new(self.coordinator.dialogue().status())
                            .size(12.0)
                            .family(egui::FontFamily::Monospace)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let response = ui.button("🔍").on_hover_text("Toggle Debug Panel");
                        response.widget_info(|| {
                            egui::WidgetInfo::labeled(
                                egui::WidgetType::Button,
                                true,
                                "Toggle debug panel",
                            )
                        });
                        toggled = response.clicked();
                    });
                });
            });
        toggled
    }

    fn show_telemetry(&self, ctx: &egui::Context, surface: &Surface) {
        let telemetry = &surface.telemetry;
        SidePanel::left("telemetry")
            .resizable(false)
            .exact_width(260.0)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                let core = ui.label(
                    RichText::new(telemetry.core_readout.to_string())
                        .size(48.0)
                        .strong()
                        .family(egui::FontFamily::Monospace)
                        .color(self.theme.load_color(telemetry.cpu.load)),
                );
                let core_label = format!("Core load {}", telemetry.core_readout);
                core.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &core_label)
                });
                ui.add_space(self.theme.spacing);

                Meter::new("CPU", &telemetry.cpu, &self.theme).show(ui);
                LoadGraph::new(
                    &telemetry.graph,
                    self.graph_projection,
                    telemetry.cpu.load,
                    &self.theme,
                )
                .show(ui);
                ui.add_space(self.theme.spacing_sm);
                Meter::new("RAM", &telemetry.ram, &self.theme).show(ui);
                if let Some(gpu) = &telemetry.gpu {
                    Meter::new("GPU", &gpu.load, &self.theme).show(ui);
                }
            });
    }
}

impl eframe::App for HudApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.frame(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.coordinator.stop_speaking();
        if let Some(mut handle) = self.handle.take() {
            handle.shutdown();
        }
    }
}
