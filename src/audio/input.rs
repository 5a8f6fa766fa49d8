use crate::{HudError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::Sender;
use tracing::{debug, error, info};

/// Whether the default host exposes an input device at all
pub fn input_available() -> bool {
    cpal::default_host().default_input_device().is_some()
}

/// The default input device, opened on demand
pub struct Microphone {
    device: Device,
    config: StreamConfig,
    sample_format: SampleFormat,
}

impl Microphone {
    pub fn open_default() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| HudError::AudioDevice("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported = device
            .default_input_config()
            .map_err(|e| HudError::AudioDevice(format!("Failed to get input config: {}", e)))?;

        Ok(Self {
            device,
            sample_format: supported.sample_format(),
            config: supported.into(),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    /// Start capturing. Mono chunks are sent to `audio_tx` until the returned
    /// stream is dropped.
    pub fn capture(&self, audio_tx: Sender<Vec<f32>>) -> Result<Stream> {
        let stream = match self.sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(audio_tx)?,
            SampleFormat::I16 => self.build_stream::<i16>(audio_tx)?,
            SampleFormat::U16 => self.build_stream::<u16>(audio_tx)?,
            other => {
                return Err(HudError::AudioDevice(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        };

        stream
            .play()
            .map_err(|e| HudError::AudioDevice(format!("Failed to start input stream: {}", e)))?;

        debug!(
            "Capturing {} Hz, {} channel(s)",
            self.sample_rate(),
            self.channels()
        );
        Ok(stream)
    }

    fn build_stream<T>(&self, audio_tx: Sender<Vec<f32>>) -> Result<Stream>
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        let channels = self.config.channels as usize;

        self.device
            .build_input_stream(
                &self.config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    // Average all channels to mono
                    let samples: Vec<f32> = data
                        .chunks(channels)
                        .map(|frame| {
                            frame.iter().map(|s| f32::from_sample(*s)).sum::<f32>()
                                / channels as f32
                        })
                        .collect();

                    if let Err(e) = audio_tx.try_send(samples) {
                        debug!("Dropping audio chunk: {}", e);
                    }
                },
                |err| error!("Audio input stream error: {}", err),
                None,
            )
            .map_err(|e| HudError::AudioDevice(format!("Failed to build input stream: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_microphone_open() {
        // No input device on most CI machines
        if let Ok(mic) = Microphone::open_default() {
            assert!(mic.sample_rate() > 0);
            assert!(mic.channels() > 0);
        }
    }
}
