//! Whisper speech recognition over the default microphone
//!
//! A worker thread owns the capture stream (cpal streams must stay on the
//! thread that built them), the VAD and the Whisper context. The UI side only
//! sends start/stop commands.

use super::recognition::{RecognitionEvent, Recognizer};
use crate::audio::{input_available, Microphone, SpeechDetector, StreamResampler, RECOGNITION_SAMPLE_RATE};
use crate::utils::Repaint;
use crate::{HudError, Result};
use crossbeam_channel::{bounded, never, select, tick, unbounded, Receiver, Sender};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Whisper needs at least one second of audio
const MIN_TRANSCRIBE_SAMPLES: usize = RECOGNITION_SAMPLE_RATE as usize;
/// Utterances shorter than this are dropped without transcription
const MIN_UTTERANCE_SAMPLES: usize = RECOGNITION_SAMPLE_RATE as usize / 4;
const WORKER_TICK: Duration = Duration::from_millis(100);

#[derive(Clone, Debug)]
pub struct WhisperSettings {
    pub model_path: PathBuf,
    /// `None` for auto-detection
    pub language: Option<String>,
    pub n_threads: i32,
    /// Trailing non-speech that ends an utterance
    pub silence: Duration,
    /// Hard cap on a listening session
    pub max_listen: Duration,
    /// Minimum spacing between interim transcripts
    pub interim_interval: Duration,
    pub vad_threshold: f32,
}

impl Default for WhisperSettings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            language: Some("en".to_string()),
            n_threads: 4,
            silence: Duration::from_millis(1200),
            max_listen: Duration::from_secs(15),
            interim_interval: Duration::from_millis(1500),
            vad_threshold: 0.5,
        }
    }
}

/// Loaded Whisper model
pub struct Transcriber {
    context: WhisperContext,
    language: Option<String>,
    n_threads: i32,
}

impl Transcriber {
    pub fn load(settings: &WhisperSettings) -> Result<Self> {
        info!("Loading Whisper model from: {:?}", settings.model_path);

        if !settings.model_path.exists() {
            return Err(HudError::ModelLoad(format!(
                "Model file not found: {:?}",
                settings.model_path
            )));
        }

        let path = settings
            .model_path
            .to_str()
            .ok_or_else(|| HudError::ModelLoad("Invalid model path".to_string()))?;
        let context = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| HudError::ModelLoad(format!("Failed to load Whisper model: {:?}", e)))?;

        info!("Whisper model loaded");
        Ok(Self {
            context,
            language: settings.language.clone(),
            n_threads: settings.n_threads,
        })
    }

    /// Transcribe 16 kHz mono samples.
    pub fn transcribe(&self, samples: &[f32]) -> Result<String> {
        let mut audio = samples.to_vec();
        if audio.len() < MIN_TRANSCRIBE_SAMPLES {
            audio.resize(MIN_TRANSCRIBE_SAMPLES, 0.0);
        }

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.n_threads);
        params.set_translate(false);
        params.set_print_timestamps(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_single_segment(true);
        if let Some(ref lang) = self.language {
            params.set_language(Some(lang));
        }

        let mut state = self
            .context
            .create_state()
            .map_err(|e| HudError::Recognition(format!("Failed to create state: {:?}", e)))?;

        state
            .full(params, &audio)
            .map_err(|e| HudError::Recognition(format!("Transcription failed: {:?}", e)))?;

        let segments = state
            .full_n_segments()
            .map_err(|e| HudError::Recognition(format!("Failed to get segments: {:?}", e)))?;

        let mut text = String::new();
        for i in 0..segments {
            let segment = state.full_get_segment_text(i).map_err(|e| {
                HudError::Recognition(format!("Failed to get segment text: {:?}", e))
            })?;
            text.push_str(&segment);
        }

        Ok(clean_transcript(&text))
    }
}

/// Strip whitespace and Whisper's non-speech markers such as `[BLANK_AUDIO]`
/// or `(wind blowing)`.
pub fn clean_transcript(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

enum WorkerCommand {
    Start,
    Stop,
    Shutdown,
}

/// [`Recognizer`] backed by cpal capture and whisper-rs
pub struct WhisperRecognizer {
    commands: Sender<WorkerCommand>,
    worker: Option<JoinHandle<()>>,
}

impl WhisperRecognizer {
    /// Check for an input device, load the model and start the worker.
    pub fn spawn(
        settings: WhisperSettings,
        events: Sender<RecognitionEvent>,
        repaint: Repaint,
    ) -> Result<Self> {
        if !input_available() {
            return Err(HudError::AudioDevice("No input device available".into()));
        }
        let transcriber = Transcriber::load(&settings)?;
        let detector = SpeechDetector::new(settings.vad_threshold)?;

        let (commands, command_rx) = unbounded();
        let worker = thread::Builder::new()
            .name("hud-recognizer".into())
            .spawn(move || {
                let mut worker = Worker {
                    settings,
                    transcriber,
                    detector,
                    events,
                    repaint,
                    session: None,
                };
                worker.run(command_rx);
            })?;

        Ok(Self {
            commands,
            worker: Some(worker),
        })
    }
}

impl Recognizer for WhisperRecognizer {
    fn start(&mut self) -> Result<()> {
        self.commands
            .send(WorkerCommand::Start)
            .map_err(|_| HudError::Channel("Recognizer worker has stopped".into()))
    }

    fn stop(&mut self) {
        if self.commands.send(WorkerCommand::Stop).is_err() {
            debug!("Recognizer worker already stopped");
        }
    }
}

impl Drop for WhisperRecognizer {
    fn drop(&mut self) {
        let _ = self.commands.send(WorkerCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Recognizer worker panicked");
            }
        }
    }
}

/// One listening session
struct Session {
    stream: cpal::Stream,
    audio_rx: Receiver<Vec<f32>>,
    resampler: StreamResampler,
    samples: Vec<f32>,
    heard_speech: bool,
    trailing_silence: Duration,
    started: Instant,
    last_interim: Instant,
    interim_len: usize,
}

impl Session {
    fn open() -> Result<Self> {
        let microphone = Microphone::open_default()?;
        let resampler = StreamResampler::new(microphone.sample_rate(), RECOGNITION_SAMPLE_RATE)?;
        let (audio_tx, audio_rx) = bounded(256);
        let stream = microphone.capture(audio_tx)?;
        let now = Instant::now();

        Ok(Self {
            stream,
            audio_rx,
            resampler,
            samples: Vec::new(),
            heard_speech: false,
            trailing_silence: Duration::ZERO,
            started: now,
            last_interim: now,
            interim_len: 0,
        })
    }
}

struct Worker {
    settings: WhisperSettings,
    transcriber: Transcriber,
    detector: SpeechDetector,
    events: Sender<RecognitionEvent>,
    repaint: Repaint,
    session: Option<Session>,
}

impl Worker {
    fn run(&mut self, commands: Receiver<WorkerCommand>) {
        let ticker = tick(WORKER_TICK);

        loop {
            let audio_rx = self
                .session
                .as_ref()
                .map(|s| s.audio_rx.clone())
                .unwrap_or_else(never);

            select! {
                recv(commands) -> command => match command {
                    Ok(WorkerCommand::Start) => self.start_session(),
                    Ok(WorkerCommand::Stop) => self.finish_session(),
                    Ok(WorkerCommand::Shutdown) | Err(_) => {
                        if self.session.take().is_some() {
                            self.emit(RecognitionEvent::Ended);
                        }
                        break;
                    }
                },
                recv(audio_rx) -> chunk => {
                    if let Ok(chunk) = chunk {
                        if let Err(e) = self.feed(&chunk) {
                            self.fail(e);
                        }
                    }
                },
                recv(ticker) -> _ => self.on_tick(),
            }
        }

        debug!("Recognizer worker exiting");
    }

    fn emit(&self, event: RecognitionEvent) {
        if self.events.send(event).is_err() {
            debug!("Recognition event receiver dropped");
        }
        (self.repaint)();
    }

    fn start_session(&mut self) {
        if self.session.is_some() {
            debug!("Already listening");
            return;
        }

        match Session::open() {
            Ok(session) => {
                self.detector.reset();
                self.session = Some(session);
                info!("Listening");
                self.emit(RecognitionEvent::Started);
            }
            Err(e) => {
                warn!("Could not start listening: {}", e);
                self.emit(RecognitionEvent::Error(e.to_string()));
                self.emit(RecognitionEvent::Ended);
            }
        }
    }

    fn feed(&mut self, chunk: &[f32]) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        let resampled = session.resampler.push(chunk)?;
        for is_speech in self.detector.feed(&resampled) {
            if is_speech {
                session.heard_speech = true;
                session.trailing_silence = Duration::ZERO;
            } else if session.heard_speech {
                session.trailing_silence += SpeechDetector::window();
            }
        }
        session.samples.extend(resampled);
        Ok(())
    }

    fn on_tick(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let silent_too_long =
            session.heard_speech && session.trailing_silence >= self.settings.silence;
        if silent_too_long || session.started.elapsed() >= self.settings.max_listen {
            self.finish_session();
            return;
        }

        let due = session.heard_speech
            && session.last_interim.elapsed() >= self.settings.interim_interval
            && session.samples.len() > session.interim_len;
        if !due {
            return;
        }

        let samples = session.samples.clone();
        match self.transcriber.transcribe(&samples) {
            Ok(text) if !text.is_empty() => self.emit(RecognitionEvent::interim(text)),
            Ok(_) => {}
            Err(e) => debug!("Interim transcription failed: {}", e),
        }
        if let Some(session) = self.session.as_mut() {
            session.last_interim = Instant::now();
            session.interim_len = samples.len();
        }
    }

    fn finish_session(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        // Late callbacks may still be queued
        while let Ok(chunk) = session.audio_rx.try_recv() {
            if let Ok(resampled) = session.resampler.push(&chunk) {
                session.samples.extend(resampled);
            }
        }
        match session.resampler.flush() {
            Ok(rest) => session.samples.extend(rest),
            Err(e) => debug!("Resampler flush failed: {}", e),
        }
        drop(session.stream);

        if session.heard_speech && session.samples.len() >= MIN_UTTERANCE_SAMPLES {
            match self.transcriber.transcribe(&session.samples) {
                Ok(text) if !text.is_empty() => {
                    info!("Heard: {:?}", text);
                    self.emit(RecognitionEvent::final_transcript(text));
                }
                Ok(_) => debug!("Empty transcript"),
                Err(e) => {
                    warn!("Transcription failed: {}", e);
                    self.emit(RecognitionEvent::Error(e.to_string()));
                }
            }
        } else {
            debug!("No speech heard");
        }

        self.emit(RecognitionEvent::Ended);
    }

    fn fail(&mut self, error: HudError) {
        warn!("Recognition failed: {}", error);
        self.session = None;
        self.emit(RecognitionEvent::Error(error.to_string()));
        self.emit(RecognitionEvent::Ended);
    }
}
