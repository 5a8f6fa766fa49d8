//! Speech recognition contract

use crate::Result;

/// Lifecycle and result events from a recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Capture began
    Started,
    /// Interim (`is_final == false`) or final transcript of the current utterance
    Transcript { text: String, is_final: bool },
    /// Session over; always the last event of a session
    Ended,
    /// Engine failure mid-session; followed by `Ended`
    Error(String),
}

impl RecognitionEvent {
    pub fn interim(text: impl Into<String>) -> Self {
        Self::Transcript {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_transcript(text: impl Into<String>) -> Self {
        Self::Transcript {
            text: text.into(),
            is_final: true,
        }
    }

    /// Whether this event ends the session
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecognitionEvent::Ended | RecognitionEvent::Error(_))
    }
}

/// A speech recognizer. Events arrive on the channel it was built with.
pub trait Recognizer: Send {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self);
}
