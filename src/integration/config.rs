//! Application configuration
//!
//! Loaded from TOML. Every field has a default, so a missing or partial file
//! is valid.

use crate::backend::{normalize_base_url, DEFAULT_BASE_URL};
use crate::coordinator::GreetingSettings;
use crate::messages::ChatLabels;
use crate::speech::{EngineChoice, Prosody};
use crate::ui::surface::NotificationTiming;
use crate::{HudError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Path of the config file to read, if set
pub const CONFIG_ENV: &str = "HUD_CONFIG";
/// Overrides `backend.base_url`
pub const BACKEND_URL_ENV: &str = "HUD_BACKEND_URL";
/// Upper bound for `telemetry.jitter`, in CPU percentage points
pub const MAX_CONFIG_JITTER: f64 = 5.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    pub backend: BackendConfig,
    pub telemetry: TelemetryConfig,
    pub speech: SpeechConfig,
    pub recognition: RecognitionConfig,
    pub ui: UiConfig,
    pub greeting: GreetingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// No timeout when unset; a hung request only delays its own reply
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub poll_interval_ms: u64,
    pub history_len: usize,
    /// Maximum random offset applied to the CPU value
    pub jitter: f64,
    pub graph_width: f32,
    pub graph_height: f32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            history_len: 20,
            jitter: 1.0,
            graph_width: 300.0,
            graph_height: 100.0,
        }
    }
}

impl TelemetryConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub engine: EngineChoice,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Voice language tag prefix
    pub language_prefix: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        let prosody = Prosody::default();
        Self {
            engine: EngineChoice::Auto,
            rate: prosody.rate,
            pitch: prosody.pitch,
            volume: prosody.volume,
            language_prefix: "en".to_string(),
        }
    }
}

impl SpeechConfig {
    pub fn prosody(&self) -> Prosody {
        Prosody {
            pitch: self.pitch,
            rate: self.rate,
            volume: self.volume,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub enabled: bool,
    pub model_path: PathBuf,
    /// Empty for auto-detection
    pub language: String,
    pub n_threads: i32,
    pub silence_ms: u64,
    pub max_listen_secs: u64,
    pub interim_interval_ms: u64,
    pub vad_threshold: f32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            language: "en".to_string(),
            n_threads: 4,
            silence_ms: 1200,
            max_listen_secs: 15,
            interim_interval_ms: 1500,
            vad_threshold: 0.5,
        }
    }
}

#[cfg(feature = "audio-io")]
impl RecognitionConfig {
    pub fn whisper_settings(&self) -> crate::speech::WhisperSettings {
        crate::speech::WhisperSettings {
            model_path: self.model_path.clone(),
            language: (!self.language.is_empty()).then(|| self.language.clone()),
            n_threads: self.n_threads,
            silence: Duration::from_millis(self.silence_ms),
            max_listen: Duration::from_secs(self.max_listen_secs),
            interim_interval: Duration::from_millis(self.interim_interval_ms),
            vad_threshold: self.vad_threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub notification_ms: u64,
    pub operator_label: String,
    pub assistant_label: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        let labels = ChatLabels::default();
        Self {
            notification_ms: 3000,
            operator_label: labels.operator,
            assistant_label: labels.assistant,
            window_width: 1280.0,
            window_height: 800.0,
        }
    }
}

impl UiConfig {
    pub fn labels(&self) -> ChatLabels {
        ChatLabels {
            operator: self.operator_label.clone(),
            assistant: self.assistant_label.clone(),
        }
    }

    pub fn notification_timing(&self) -> NotificationTiming {
        NotificationTiming {
            lifetime: Duration::from_millis(self.notification_ms),
            ..NotificationTiming::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingConfig {
    pub enabled: bool,
    pub command: String,
    pub known_names: Vec<String>,
    pub default_name: String,
    pub delay_ms: u64,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        let greeting = GreetingSettings::default();
        Self {
            enabled: true,
            command: greeting.command,
            known_names: greeting.known_names,
            default_name: greeting.default_name,
            delay_ms: greeting.delay.as_millis() as u64,
        }
    }
}

impl GreetingConfig {
    pub fn settings(&self) -> GreetingSettings {
        GreetingSettings {
            command: self.command.clone(),
            known_names: self.known_names.clone(),
            default_name: self.default_name.clone(),
            delay: Duration::from_millis(self.delay_ms),
        }
    }
}

impl HudConfig {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: HudConfig = toml::from_str(content)?;
        config.backend.base_url = normalize_base_url(&config.backend.base_url);
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            HudError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// `$HUD_CONFIG`, then `<config dir>/hud/config.toml`, then defaults.
    /// `$HUD_BACKEND_URL` is applied last.
    pub fn load() -> Result<Self> {
        let mut config = match Self::locate() {
            Some(path) => {
                info!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            config = config.with_backend_url(&url);
        }

        config.validate()?;
        Ok(config)
    }

    fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("hud").join("config.toml"))
            .filter(|path| path.exists())
    }

    pub fn with_backend_url(mut self, url: &str) -> Self {
        self.backend.base_url = normalize_base_url(url);
        self
    }

    /// Disable voice output
    pub fn without_speech(mut self) -> Self {
        self.speech.engine = EngineChoice::None;
        self
    }

    /// Disable voice input
    pub fn without_recognition(mut self) -> Self {
        self.recognition.enabled = false;
        self
    }

    pub fn without_greeting(mut self) -> Self {
        self.greeting.enabled = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = &self.backend.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(HudError::Config(format!(
                "backend.base_url must be an http(s) URL, got {:?}",
                url
            )));
        }

        if self.telemetry.history_len < 2 {
            return Err(HudError::Config(
                "telemetry.history_len must be at least 2".to_string(),
            ));
        }

        let jitter = self.telemetry.jitter;
        if !jitter.is_finite() || !(0.0..=MAX_CONFIG_JITTER).contains(&jitter) {
            return Err(HudError::Config(format!(
                "telemetry.jitter must be between 0 and {}, got {}",
                MAX_CONFIG_JITTER, jitter
            )));
        }

        if self.telemetry.poll_interval_ms == 0 {
            return Err(HudError::Config(
                "telemetry.poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        let s = &self.speech;
        if !(0.1..=10.0).contains(&s.rate)
            || !(0.0..=2.0).contains(&s.pitch)
            || !(0.0..=1.0).contains(&s.volume)
        {
            return Err(HudError::Config(format!(
                "speech prosody out of range (rate {}, pitch {}, volume {})",
                s.rate, s.pitch, s.volume
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HudConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.telemetry.history_len, 20);
        assert_eq!(config.telemetry.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.speech.prosody(), Prosody::default());
        assert_eq!(config.greeting.settings(), GreetingSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = HudConfig::from_toml(
            r#"
            [backend]
            base_url = "http://192.168.1.20:5000/command/"

            [speech]
            engine = "none"

            [greeting]
            known_names = ["Arish", "Maya"]
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "http://192.168.1.20:5000");
        assert_eq!(config.speech.engine, EngineChoice::None);
        assert_eq!(config.speech.rate, 0.95);
        assert_eq!(config.greeting.known_names.len(), 2);
        assert_eq!(config.ui.operator_label, "BOSS");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = HudConfig::from_toml("[telemetry]\nhistory_len = \"many\"").unwrap_err();
        assert!(matches!(err, HudError::Config(_)));
    }

    #[test]
    fn test_builders() {
        let config = HudConfig::default()
            .with_backend_url("https://hud.local/")
            .without_speech()
            .without_recognition()
            .without_greeting();
        assert_eq!(config.backend.base_url, "https://hud.local");
        assert_eq!(config.speech.engine, EngineChoice::None);
        assert!(!config.recognition.enabled);
        assert!(!config.greeting.enabled);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = HudConfig::default();
        config.backend.base_url = "localhost:5000".to_string();
        assert!(config.validate().is_err());

        let mut config = HudConfig::default();
        config.telemetry.history_len = 1;
        assert!(config.validate().is_err());

        let mut config = HudConfig::default();
        config.speech.volume = 3.0;
        assert!(config.validate().is_err());

        let mut config = HudConfig::default();
        config.telemetry.jitter = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_extreme_jitter() {
        let config = HudConfig::from_toml("[telemetry]\njitter = inf").unwrap();
        assert!(config.telemetry.jitter.is_infinite());
        assert!(matches!(config.validate(), Err(HudError::Config(_))));

        let config = HudConfig::from_toml("[telemetry]\njitter = 1e308").unwrap();
        assert!(matches!(config.validate(), Err(HudError::Config(_))));

        let config = HudConfig::from_toml("[telemetry]\njitter = 2.5").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ui_conversions() {
        let config = HudConfig::default();
        assert_eq!(config.ui.labels(), ChatLabels::default());
        assert_eq!(
            config.ui.notification_timing().lifetime,
            Duration::from_millis(3000)
        );
    }
}
