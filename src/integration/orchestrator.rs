//! Start-up wiring
//!
//! Builds the tokio runtime, the backend client, the telemetry poller and
//! the speech engines, and hands back a ready [`Coordinator`] plus a handle
//! that owns the background work.

use crate::backend::{BackendClient, HttpCommandBackend};
use crate::coordinator::Coordinator;
use crate::integration::config::HudConfig;
use crate::speech::{SpeechOutput, SystemSpeechEngine};
use crate::telemetry::{SharedPollerStats, TelemetryPipeline, TelemetryPoller};
use crate::ui::surface::SharedSurface;
use crate::utils::Repaint;
use crate::Result;
use crossbeam_channel::unbounded;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tracing::{info, warn};

pub struct Orchestrator;

/// Owns the runtime and the telemetry task; dropping it shuts both down.
pub struct OrchestratorHandle {
    runtime: Option<Runtime>,
    shutdown_tx: watch::Sender<bool>,
    poller_stats: SharedPollerStats,
    backend_url: String,
}

impl Orchestrator {
    pub fn start(
        config: &HudConfig,
        surface: SharedSurface,
        repaint: Repaint,
    ) -> Result<(OrchestratorHandle, Coordinator)> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("hud-io")
            .enable_all()
            .build()?;

        let client = BackendClient::new(
            &config.backend.base_url,
            config.backend.request_timeout_secs.map(Duration::from_secs),
        )?;
        info!("Backend at {}", client.base_url());

        // Telemetry
        let pipeline = TelemetryPipeline::new(config.telemetry.history_len, config.telemetry.jitter)
            .with_graph_size(config.telemetry.graph_width, config.telemetry.graph_height);
        let poller = TelemetryPoller::new(client.clone(), pipeline, surface.clone())
            .with_interval(config.telemetry.poll_interval())
            .with_repaint(repaint.clone());
        let poller_stats = poller.stats();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        runtime.spawn(poller.run(shutdown_rx));

        // Commands
        let backend_url = client.base_url().to_string();
        let (remote_tx, remote_rx) = unbounded();
        let backend =
            HttpCommandBackend::new(client, runtime.handle().clone(), remote_tx, repaint.clone());
        let mut coordinator = Coordinator::new(surface, Box::new(backend), remote_rx)
            .with_greeting(config.greeting.settings());

        // Voice output
        let (synthesis_tx, synthesis_rx) = unbounded();
        if let Some(engine) =
            SystemSpeechEngine::detect(config.speech.engine, synthesis_tx, repaint.clone())
        {
            let output = SpeechOutput::new(
                Box::new(engine),
                config.speech.prosody(),
                &config.speech.language_prefix,
            );
            if let Some(voice) = output.selected_voice() {
                info!("Speaking with voice {} ({})", voice.name, voice.language);
            }
            coordinator = coordinator.with_speech(output, synthesis_rx);
        }

        // Voice input
        coordinator = attach_recognizer(coordinator, config, repaint);

        if config.greeting.enabled {
            coordinator.greet();
        }

        let handle = OrchestratorHandle {
            runtime: Some(runtime),
            shutdown_tx,
            poller_stats,
            backend_url,
        };
        Ok((handle, coordinator))
    }
}

#[cfg(feature = "audio-io")]
fn attach_recognizer(coordinator: Coordinator, config: &HudConfig, repaint: Repaint) -> Coordinator {
    use crate::speech::WhisperRecognizer;

    if !config.recognition.enabled {
        info!("Voice input disabled in config");
        return coordinator;
    }

    let (events_tx, events_rx) = unbounded();
    match WhisperRecognizer::spawn(config.recognition.whisper_settings(), events_tx, repaint) {
        Ok(recognizer) => coordinator.with_recognizer(Box::new(recognizer), events_rx),
        Err(e) => {
            warn!("{} ({})", e.user_message(), e);
            coordinator
        }
    }
}

#[cfg(not(feature = "audio-io"))]
fn attach_recognizer(coordinator: Coordinator, config: &HudConfig, _repaint: Repaint) -> Coordinator {
    if config.recognition.enabled {
        warn!("Voice input unavailable: built without the audio-io feature");
    }
    coordinator
}

impl OrchestratorHandle {
    pub fn poller_stats(&self) -> SharedPollerStats {
        self.poller_stats.clone()
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Stop the poller and the runtime. In-flight requests are abandoned.
    pub fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(runtime) = self.runtime.take() {
            info!("Shutting down background tasks");
            runtime.shutdown_timeout(Duration::from_secs(1));
        }
    }
}

impl Drop for OrchestratorHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
