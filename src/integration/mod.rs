//! Configuration and start-up wiring

pub mod config;
pub mod orchestrator;

pub use config::HudConfig;
pub use orchestrator::{Orchestrator, OrchestratorHandle};
