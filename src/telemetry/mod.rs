//! Telemetry rendering pipeline
//!
//! Polls the telemetry source on a fixed cadence, keeps a bounded CPU history
//! and turns each sample into bar, label and graph updates on the surface.

pub mod history;
pub mod pipeline;
pub mod poller;
pub mod sample;

pub use history::MetricHistory;
pub use pipeline::{classify_load, project_graph, smooth_cpu, LoadClass, TelemetryFrame, TelemetryPipeline};
pub use poller::{PollOutcome, PollerStats, SharedPollerStats, TelemetryPoller, TelemetrySource};
pub use sample::{GpuStats, MetricSample, RamStats, Vitals};
