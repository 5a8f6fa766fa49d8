//! Fixed-cadence telemetry polling
//!
//! One tokio task fetches a sample every tick, transforms it and applies the
//! frame to the surface. A failed fetch skips the frame; the next tick is the
//! retry.

use super::pipeline::TelemetryPipeline;
use super::sample::MetricSample;
use crate::ui::surface::SharedSurface;
use crate::utils::{Repaint, TimingTracker};
use crate::Result;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Anything that can produce a metric snapshot
pub trait TelemetrySource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<MetricSample>> + Send;
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Rendered,
    Skipped,
}

/// Counters shown in the debug panel
#[derive(Debug, Clone, Default)]
pub struct PollerStats {
    pub frames_rendered: u64,
    pub frames_skipped: u64,
    pub last_error: Option<String>,
    pub fetch_latency: TimingTracker,
}

pub type SharedPollerStats = Arc<Mutex<PollerStats>>;

/// Drives a [`TelemetryPipeline`] from a [`TelemetrySource`]
pub struct TelemetryPoller<S> {
    source: S,
    pipeline: TelemetryPipeline,
    surface: SharedSurface,
    stats: SharedPollerStats,
    interval: Duration,
    repaint: Option<Repaint>,
}

impl<S: TelemetrySource> TelemetryPoller<S> {
    pub fn new(source: S, pipeline: TelemetryPipeline, surface: SharedSurface) -> Self {
        Self {
            source,
            pipeline,
            surface,
            stats: Arc::new(Mutex::new(PollerStats::default())),
            interval: Duration::from_secs(1),
            repaint: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_repaint(mut self, repaint: Repaint) -> Self {
        self.repaint = Some(repaint);
        self
    }

    pub fn stats(&self) -> SharedPollerStats {
        self.stats.clone()
    }

    pub fn pipeline(&self) -> &TelemetryPipeline {
        &self.pipeline
    }

    /// Fetch, transform and render one frame.
    pub async fn poll_once(&mut self) -> PollOutcome {
        let started = Instant::now();
        let sample = match self.source.fetch().await {
            Ok(sample) => sample,
            Err(e) => {
                if e.is_recoverable() {
                    debug!("Telemetry fetch failed, skipping frame: {}", e);
                } else {
                    warn!("Telemetry source error, skipping frame: {}", e);
                }
                let mut stats = self.stats.lock();
                stats.frames_skipped += 1;
                stats.last_error = Some(e.to_string());
                return PollOutcome::Skipped;
            }
        };

        let frame = self.pipeline.render(&sample);
        frame.apply(&mut self.surface.write().telemetry);

        {
            let mut stats = self.stats.lock();
            stats.frames_rendered += 1;
            stats.fetch_latency.record(started.elapsed());
        }

        if let Some(repaint) = &self.repaint {
            repaint();
        }
        PollOutcome::Rendered
    }

    /// Poll until `shutdown` flips to true or its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Telemetry poller started ({:?} period)", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Telemetry poller stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HudError;
    use std::collections::VecDeque;

    struct Scripted(Mutex<VecDeque<Result<MetricSample>>>);

    impl TelemetrySource for Scripted {
        fn fetch(&self) -> impl Future<Output = Result<MetricSample>> + Send {
            let next = self
                .0
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(HudError::Transport("exhausted".into())));
            async move { next }
        }
    }

    fn poller(script: Vec<Result<MetricSample>>) -> TelemetryPoller<Scripted> {
        TelemetryPoller::new(
            Scripted(Mutex::new(script.into())),
            TelemetryPipeline::new(20, 0.0),
            SharedSurface::default(),
        )
    }

    #[tokio::test]
    async fn test_poll_once_renders() {
        let mut poller = poller(vec![Ok(MetricSample::new(42.0, 10.0))]);
        assert_eq!(poller.poll_once().await, PollOutcome::Rendered);

        let surface = poller.surface.read();
        assert_eq!(surface.telemetry.core_readout, 42);
        assert_eq!(surface.telemetry.graph.len(), 20);
        assert_eq!(poller.stats().lock().frames_rendered, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_skips_frame() {
        let mut poller = poller(vec![
            Ok(MetricSample::new(42.0, 10.0)),
            Err(HudError::Transport("refused".into())),
        ]);
        poller.poll_once().await;
        let before = poller.surface.snapshot().telemetry;
        let history_before = poller.pipeline().history().clone();

        assert_eq!(poller.poll_once().await, PollOutcome::Skipped);
        assert_eq!(poller.surface.read().telemetry, before);
        assert_eq!(poller.pipeline().history(), &history_before);

        let stats = poller.stats();
        let stats = stats.lock();
        assert_eq!(stats.frames_skipped, 1);
        assert!(stats.last_error.as_deref().unwrap_or("").contains("refused"));
    }

    #[tokio::test]
    async fn test_unrecoverable_error_still_skips_only_that_frame() {
        let mut poller = poller(vec![
            Err(HudError::Io("permission denied".into())),
            Ok(MetricSample::new(30.0, 10.0)),
        ]);

        assert_eq!(poller.poll_once().await, PollOutcome::Skipped);
        assert_eq!(poller.poll_once().await, PollOutcome::Rendered);
        assert_eq!(poller.surface.read().telemetry.core_readout, 30);

        let stats = poller.stats();
        let stats = stats.lock();
        assert_eq!((stats.frames_skipped, stats.frames_rendered), (1, 1));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let poller = poller(vec![]).with_interval(Duration::from_millis(10));
        let stats = poller.stats();
        let (tx, rx) = watch::channel(false);

        let task = tokio::spawn(poller.run(rx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();
        task.await.unwrap();

        assert!(stats.lock().frames_skipped >= 1);
    }
}
