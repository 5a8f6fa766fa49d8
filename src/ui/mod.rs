//! User interface
//!
//! An egui dashboard drawn from the shared [`surface::Surface`]. Components
//! never call into the coordinator directly; they report [`UiAction`]s that
//! the app resolves after the frame's surface lock is released.

pub mod app;
pub mod components;
pub mod surface;
pub mod theme;

pub use app::HudApp;
pub use surface::{OverlayKind, SharedSurface, Surface};
pub use theme::Theme;

/// Something the operator did this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Submit the input buffer
    Submit,
    /// Microphone button
    ToggleListening,
    ToggleDebug,
}
