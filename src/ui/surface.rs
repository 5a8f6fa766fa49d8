//! Presentation surface
//!
//! The retained model the egui app draws every frame. The coordinator and the
//! telemetry poller write to it; neither reads the other's regions.

use crate::messages::{ChatLabels, ChatLog, Sender};
use crate::telemetry::pipeline::{BarView, GpuView, GraphPoint, TelemetryDetail, VitalsView};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Toggleable telemetry overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// System diagnostics (CPU, RAM, GPU detail)
    Diagnostics,
    /// Operator biometrics
    Vitals,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 2] = [OverlayKind::Diagnostics, OverlayKind::Vitals];

    pub fn title(&self) -> &'static str {
        match self {
            OverlayKind::Diagnostics => "SYSTEM DIAGNOSTICS",
            OverlayKind::Vitals => "BIOMETRICS",
        }
    }
}

/// One visibility flag per overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlays {
    diagnostics: bool,
    vitals: bool,
}

impl Overlays {
    pub fn is_visible(&self, kind: OverlayKind) -> bool {
        match kind {
            OverlayKind::Diagnostics => self.diagnostics,
            OverlayKind::Vitals => self.vitals,
        }
    }

    /// Set visibility. Returns whether the flag changed.
    pub fn set(&mut self, kind: OverlayKind, visible: bool) -> bool {
        let flag = match kind {
            OverlayKind::Diagnostics => &mut self.diagnostics,
            OverlayKind::Vitals => &mut self.vitals,
        };
        let changed = *flag != visible;
        *flag = visible;
        changed
    }
}

/// Transient banner
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub text: String,
    pub raised_at: Instant,
}

/// What the banner should look like at a given instant
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationView {
    pub text: String,
    /// 1.0 while fully shown, falling linearly to 0.0 during the fade
    pub opacity: f32,
}

/// Banner timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotificationTiming {
    pub lifetime: Duration,
    pub fade: Duration,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            lifetime: Duration::from_millis(3000),
            fade: Duration::from_millis(500),
        }
    }
}

/// State of the microphone control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoiceControl {
    /// False when no recognizer could be constructed; the button is disabled
    pub available: bool,
    pub listening: bool,
}

/// Everything the telemetry renderer writes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryView {
    pub cpu: BarView,
    pub graph: Vec<GraphPoint>,
    pub ram: BarView,
    pub gpu: Option<GpuView>,
    pub vitals: Option<VitalsView>,
    /// Whole-number CPU readout in the core display
    pub core_readout: u32,
    pub detail: TelemetryDetail,
    /// Number of frames applied so far
    pub frames: u64,
}

/// The presentation surface
#[derive(Debug, Clone)]
pub struct Surface {
    pub chat: ChatLog,
    pub labels: ChatLabels,
    /// Text input buffer
    pub input: String,
    pub overlays: Overlays,
    notification: Option<Notification>,
    pub notification_timing: NotificationTiming,
    /// Driven by the speaking flag; output only
    pub waveform_active: bool,
    pub voice: VoiceControl,
    /// False when no synthesis engine is available
    pub speech_available: bool,
    pub telemetry: TelemetryView,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    pub fn new() -> Self {
        Self {
            chat: ChatLog::new(),
            labels: ChatLabels::default(),
            input: String::new(),
            overlays: Overlays::default(),
            notification: None,
            notification_timing: NotificationTiming::default(),
            waveform_active: false,
            voice: VoiceControl::default(),
            speech_available: false,
            telemetry: TelemetryView::default(),
        }
    }

    pub fn with_labels(mut self, labels: ChatLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_notification_timing(mut self, timing: NotificationTiming) -> Self {
        self.notification_timing = timing;
        self
    }

    /// Append a chat line
    pub fn append_chat(&mut self, sender: Sender, text: impl Into<String>) {
        self.chat.push(sender, text);
    }

    /// Chat lines rendered with their sender prefix, oldest first
    pub fn chat_lines(&self) -> Vec<String> {
        self.chat
            .messages()
            .iter()
            .map(|m| m.chat_line(&self.labels))
            .collect()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn set_overlay(&mut self, kind: OverlayKind, visible: bool) -> bool {
        self.overlays.set(kind, visible)
    }

    pub fn overlay_visible(&self, kind: OverlayKind) -> bool {
        self.overlays.is_visible(kind)
    }

    /// Raise a banner, replacing any current one.
    pub fn notify(&mut self, text: impl Into<String>) {
        self.notify_at(text, Instant::now());
    }

    pub fn notify_at(&mut self, text: impl Into<String>, now: Instant) {
        self.notification = Some(Notification {
            text: text.into(),
            raised_at: now,
        });
    }

    /// Raw text of the most recent notification, expired or not
    pub fn last_notification(&self) -> Option<&str> {
        self.notification.as_ref().map(|n| n.text.as_str())
    }

    /// Banner as visible at `now`, or `None` once it has fully faded
    pub fn notification_at(&self, now: Instant) -> Option<NotificationView> {
        let notification = self.notification.as_ref()?;
        let elapsed = now.saturating_duration_since(notification.raised_at);
        let timing = self.notification_timing;

        let opacity = if elapsed < timing.lifetime {
            1.0
        } else {
            let into_fade = elapsed - timing.lifetime;
            if into_fade >= timing.fade {
                return None;
            }
            1.0 - into_fade.as_secs_f32() / timing.fade.as_secs_f32()
        };

        Some(NotificationView {
            text: format!("⚠ {}", notification.text),
            opacity,
        })
    }

    /// Drop the banner once it has fully faded.
    pub fn expire_notification(&mut self, now: Instant) {
        if self.notification.is_some() && self.notification_at(now).is_none() {
            self.notification = None;
        }
    }
}

/// Thread-safe handle to the surface
#[derive(Clone, Debug)]
pub struct SharedSurface {
    inner: Arc<RwLock<Surface>>,
}

impl Default for SharedSurface {
    fn default() -> Self {
        Self::new(Surface::new())
    }
}

impl SharedSurface {
    pub fn new(surface: Surface) -> Self {
        Self {
            inner: Arc::new(RwLock::new(surface)),
        }
    }

    /// Get a read lock on the surface
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, Surface> {
        self.inner.read()
    }

    /// Get a write lock on the surface
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, Surface> {
        self.inner.write()
    }

    /// Copy of the current surface (no lock held after return)
    pub fn snapshot(&self) -> Surface {
        self.inner.read().clone()
    }
}
