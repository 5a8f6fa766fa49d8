//! UI components for the HUD

mod chat_log;
mod debug_panel;
mod graph;
mod input_bar;
mod meter;
mod notification;
mod overlays;
mod waveform;

pub use chat_log::ChatLogView;
pub use debug_panel::DebugPanel;
pub use graph::LoadGraph;
pub use input_bar::InputBar;
pub use meter::Meter;
pub use notification::NotificationBanner;
pub use overlays::Overlay;
pub use waveform::Waveform;
