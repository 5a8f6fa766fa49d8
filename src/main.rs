use anyhow::{Context, Result};
use hud::integration::HudConfig;
use hud::ui::HudApp;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hud=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = HudConfig::load().context("failed to load configuration")?;
    info!("Starting HUD");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.ui.window_width, config.ui.window_height])
            .with_title("HUD"),
        ..Default::default()
    };

    eframe::run_native(
        "HUD",
        options,
        Box::new(|cc| Ok(Box::new(HudApp::new(cc, config)?))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))
}
