use crate::{HudError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

const CHUNK_FRAMES: usize = 1024;

/// Incremental mono resampler
///
/// Capture callbacks deliver arbitrary chunk sizes; input is queued until a
/// full resampler chunk is available. [`StreamResampler::flush`] pads and
/// drains the remainder at the end of an utterance.
pub struct StreamResampler {
    resampler: Option<SincFixedIn<f32>>,
    ratio: f64,
    pending: Vec<f32>,
}

impl StreamResampler {
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(HudError::Config(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let ratio = output_rate as f64 / input_rate as f64;
        let resampler = if input_rate == output_rate {
            None
        } else {
            let params = SincInterpolationParameters {
                sinc_len: 128,
                f_cutoff: 0.95,
                interpolation: SincInterpolationType::Linear,
                oversampling_factor: 128,
                window: WindowFunction::BlackmanHarris2,
            };
            let resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_FRAMES, 1)
                .map_err(|e| HudError::AudioDevice(format!("Failed to create resampler: {}", e)))?;
            debug!("Resampling {} Hz -> {} Hz", input_rate, output_rate);
            Some(resampler)
        };

        Ok(Self {
            resampler,
            ratio,
            pending: Vec::new(),
        })
    }

    /// Queue `input` and return whatever full chunks produced.
    pub fn push(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let Some(resampler) = self.resampler.as_mut() else {
            return Ok(input.to_vec());
        };

        self.pending.extend_from_slice(input);
        let mut output = Vec::new();
        while self.pending.len() >= CHUNK_FRAMES {
            let chunk: Vec<f32> = self.pending.drain(..CHUNK_FRAMES).collect();
            let processed = resampler
                .process(&[chunk], None)
                .map_err(|e| HudError::AudioDevice(format!("Resampling failed: {}", e)))?;
            output.extend_from_slice(&processed[0]);
        }
        Ok(output)
    }

    /// Drain the queued remainder, zero-padded to a full chunk and trimmed
    /// back to its proportional length.
    pub fn flush(&mut self) -> Result<Vec<f32>> {
        let Some(resampler) = self.resampler.as_mut() else {
            return Ok(Vec::new());
        };
        if self.pending.is_empty() {
            return Ok(Vec::new());
        }

        let remaining = self.pending.len();
        let mut chunk = std::mem::take(&mut self.pending);
        chunk.resize(CHUNK_FRAMES, 0.0);

        let processed = resampler
            .process(&[chunk], None)
            .map_err(|e| HudError::AudioDevice(format!("Resampling failed: {}", e)))?;
        let keep = ((remaining as f64) * self.ratio).ceil() as usize;
        Ok(processed[0].iter().take(keep).copied().collect())
    }
}
