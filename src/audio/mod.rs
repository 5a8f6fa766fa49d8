//! Microphone capture for speech recognition
//!
//! Capture is mono; the recognizer resamples to 16 kHz and runs voice
//! activity detection to find the end of an utterance.

pub mod input;
pub mod resampler;
pub mod vad;

pub use input::{input_available, Microphone};
pub use resampler::StreamResampler;
pub use vad::SpeechDetector;

/// Sample rate expected by Whisper and the VAD model
pub const RECOGNITION_SAMPLE_RATE: u32 = 16_000;
