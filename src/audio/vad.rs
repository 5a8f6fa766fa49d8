use super::RECOGNITION_SAMPLE_RATE;
use crate::{HudError, Result};
use tracing::info;
use voice_activity_detector::VoiceActivityDetector;

/// Silero VAD window at 16 kHz (32 ms)
pub const VAD_CHUNK: usize = 512;

/// Frame-by-frame speech detection over 16 kHz mono audio
pub struct SpeechDetector {
    detector: VoiceActivityDetector,
    threshold: f32,
    pending: Vec<f32>,
}

impl SpeechDetector {
    pub fn new(threshold: f32) -> Result<Self> {
        let detector = VoiceActivityDetector::builder()
            .sample_rate(RECOGNITION_SAMPLE_RATE as i32)
            .chunk_size(VAD_CHUNK)
            .build()
            .map_err(|e| HudError::ModelLoad(format!("Failed to create VAD: {:?}", e)))?;

        info!("VAD ready (threshold {})", threshold);
        Ok(Self {
            detector,
            threshold: threshold.clamp(0.0, 1.0),
            pending: Vec::new(),
        })
    }

    /// Duration of one VAD window
    pub fn window() -> std::time::Duration {
        std::time::Duration::from_millis(
            (VAD_CHUNK as u64 * 1000) / RECOGNITION_SAMPLE_RATE as u64,
        )
    }

    /// Feed samples; returns one verdict per completed window.
    pub fn feed(&mut self, samples: &[f32]) -> Vec<bool> {
        self.pending.extend_from_slice(samples);
        let mut verdicts = Vec::new();
        while self.pending.len() >= VAD_CHUNK {
            let window: Vec<f32> = self.pending.drain(..VAD_CHUNK).collect();
            let probability = self.detector.predict(window);
            verdicts.push(probability >= self.threshold);
        }
        verdicts
    }

    /// Forget queued samples and model state between utterances.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.detector.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_is_not_speech() {
        let mut detector = SpeechDetector::new(0.5).unwrap();
        let verdicts = detector.feed(&vec![0.0; VAD_CHUNK * 3 + 100]);
        assert_eq!(verdicts, vec![false, false, false]);
    }

    #[test]
    fn test_window_duration() {
        assert_eq!(SpeechDetector::window().as_millis(), 32);
    }
}
