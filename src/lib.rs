//! HUD - voice-capable heads-up display client
//!
//! Renders a live dashboard, routes typed or spoken commands either to local
//! overlay actions or to a remote command backend, speaks responses aloud and
//! visualizes system telemetry as color-coded bars and graphs.

#[cfg(feature = "audio-io")]
pub mod audio;
pub mod backend;
pub mod coordinator;
pub mod integration;
pub mod messages;
pub mod speech;
pub mod telemetry;
pub mod ui;
pub mod utils;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum HudError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Channel error: {0}")]
    Channel(String),
}

impl From<std::io::Error> for HudError {
    fn from(e: std::io::Error) -> Self {
        HudError::Io(e.to_string())
    }
}

impl From<reqwest::Error> for HudError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            HudError::Decode(e.to_string())
        } else {
            HudError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for HudError {
    fn from(e: serde_json::Error) -> Self {
        HudError::Decode(e.to_string())
    }
}

impl From<toml::de::Error> for HudError {
    fn from(e: toml::de::Error) -> Self {
        HudError::Config(e.to_string())
    }
}

impl HudError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The next request or tick retries implicitly
            HudError::Transport(_) => true,
            HudError::Decode(_) => true,
            HudError::Speech(_) => true,
            HudError::Recognition(_) => true,
            // Hardware and model problems need the operator
            HudError::AudioDevice(_) => false,
            HudError::ModelLoad(_) => false,
            HudError::Config(_) => false,
            HudError::Io(_) => false,
            HudError::Channel(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            HudError::Transport(_) | HudError::Decode(_) => {
                "Neural Link Offline.".to_string()
            }
            HudError::Speech(_) => {
                "Speech output failed. Responses will be shown as text.".to_string()
            }
            HudError::Recognition(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            HudError::AudioDevice(_) => {
                "Audio device error. Please check your microphone.".to_string()
            }
            HudError::ModelLoad(_) => {
                "Failed to load the speech model. Voice input is disabled.".to_string()
            }
            HudError::Config(_) => "Configuration error. Please check settings.".to_string(),
            HudError::Io(_) => "File system error occurred.".to_string(),
            HudError::Channel(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, HudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_are_recoverable() {
        assert!(HudError::Transport("refused".into()).is_recoverable());
        assert!(HudError::Decode("eof".into()).is_recoverable());
        assert!(!HudError::Config("bad".into()).is_recoverable());
    }

    #[test]
    fn test_transport_user_message_matches_offline_text() {
        assert_eq!(
            HudError::Transport("timeout".into()).user_message(),
            "Neural Link Offline."
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let err: HudError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, HudError::Io(_)));
    }
}
