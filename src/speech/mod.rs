//! Speech input and output
//!
//! - Synthesis through the platform speech program, behind [`SpeechEngine`]
//! - Recognition with Whisper, behind [`Recognizer`] (`audio-io` feature)

pub mod recognition;
#[cfg(feature = "audio-io")]
pub mod stt;
pub mod synthesis;
pub mod system_tts;

pub use recognition::{RecognitionEvent, Recognizer};
#[cfg(feature = "audio-io")]
pub use stt::{WhisperRecognizer, WhisperSettings};
pub use synthesis::{
    select_voice, Prosody, SpeechEngine, SpeechOutput, SynthesisEvent, Utterance, UtteranceId,
    Voice, MASCULINE_VOICE_NAMES,
};
pub use system_tts::{normalize_text_for_speech, EngineChoice, SystemSpeechEngine};
