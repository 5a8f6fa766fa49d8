//! Small shared helpers

pub mod perf;

pub use perf::{FpsCounter, TimingTracker};

use std::sync::Arc;

/// Wakes the UI after a background task changed the surface.
pub type Repaint = Arc<dyn Fn() + Send + Sync>;

/// Repaint hook that does nothing, for headless use and tests.
pub fn no_repaint() -> Repaint {
    Arc::new(|| {})
}
