//! Test doubles shared by the integration tests
#![allow(dead_code)]

pub mod http;

use crossbeam_channel::{unbounded, Receiver, Sender};
use hud::backend::{CommandBackend, CommandRequest, RemoteEvent};
use hud::coordinator::Coordinator;
use hud::speech::{
    Prosody, RecognitionEvent, Recognizer, SpeechEngine, SpeechOutput, SynthesisEvent, Utterance,
    Voice,
};
use hud::ui::SharedSurface;
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every request instead of sending it
#[derive(Clone, Default)]
pub struct RecordingBackend {
    pub requests: Arc<Mutex<Vec<CommandRequest>>>,
}

impl CommandBackend for RecordingBackend {
    fn send(&self, request: CommandRequest) {
        self.requests.lock().push(request);
    }
}

/// What a [`FakeEngine`] has been asked to do
#[derive(Debug, Default)]
pub struct EngineLog {
    /// The utterance currently occupying the engine
    pub active: Option<String>,
    pub spoken: Vec<String>,
    pub cancels: usize,
}

#[derive(Clone, Default)]
pub struct FakeEngine {
    pub log: Arc<Mutex<EngineLog>>,
}

impl SpeechEngine for FakeEngine {
    fn voices(&self) -> Vec<Voice> {
        vec![Voice::new("Daniel", "en-GB", "daniel")]
    }

    fn speak(&mut self, utterance: Utterance) -> hud::Result<()> {
        let mut log = self.log.lock();
        log.active = Some(utterance.text.clone());
        log.spoken.push(utterance.text);
        Ok(())
    }

    fn cancel(&mut self) {
        let mut log = self.log.lock();
        log.active = None;
        log.cancels += 1;
    }
}

#[derive(Clone, Default)]
pub struct FakeRecognizer {
    pub starts: Arc<Mutex<usize>>,
    pub stops: Arc<Mutex<usize>>,
    /// When set, `start` fails with an audio device error carrying this text
    pub device_error: Arc<Mutex<Option<String>>>,
}

impl Recognizer for FakeRecognizer {
    fn start(&mut self) -> hud::Result<()> {
        *self.starts.lock() += 1;
        match self.device_error.lock().clone() {
            Some(reason) => Err(hud::HudError::AudioDevice(reason)),
            None => Ok(()),
        }
    }

    fn stop(&mut self) {
        *self.stops.lock() += 1;
    }
}

/// A coordinator wired to fakes, plus the handles to drive and inspect it
pub struct Rig {
    pub coordinator: Coordinator,
    pub surface: SharedSurface,
    pub backend: RecordingBackend,
    pub engine: FakeEngine,
    pub recognizer: FakeRecognizer,
    pub remote_tx: Sender<RemoteEvent>,
    pub synthesis_tx: Sender<SynthesisEvent>,
    pub recognition_tx: Sender<RecognitionEvent>,
}

impl Rig {
    /// Coordinator with speech output and voice input
    pub fn new() -> Self {
        let surface = SharedSurface::default();
        let backend = RecordingBackend::default();
        let engine = FakeEngine::default();
        let recognizer = FakeRecognizer::default();
        let (remote_tx, remote_rx) = unbounded();
        let (synthesis_tx, synthesis_rx) = unbounded();
        let (recognition_tx, recognition_rx) = unbounded();

        let speech = SpeechOutput::new(Box::new(engine.clone()), Prosody::default(), "en");
        let coordinator = Coordinator::new(surface.clone(), Box::new(backend.clone()), remote_rx)
            .with_speech(speech, synthesis_rx)
            .with_recognizer(Box::new(recognizer.clone()), recognition_rx);

        Self {
            coordinator,
            surface,
            backend,
            engine,
            recognizer,
            remote_tx,
            synthesis_tx,
            recognition_tx,
        }
    }

    /// Coordinator with no speech capabilities at all
    pub fn silent() -> (Coordinator, SharedSurface, RecordingBackend, Sender<RemoteEvent>) {
        let surface = SharedSurface::default();
        let backend = RecordingBackend::default();
        let (remote_tx, remote_rx): (Sender<RemoteEvent>, Receiver<RemoteEvent>) = unbounded();
        let coordinator = Coordinator::new(surface.clone(), Box::new(backend.clone()), remote_rx);
        (coordinator, surface, backend, remote_tx)
    }

    pub fn requests(&self) -> Vec<CommandRequest> {
        self.backend.requests.lock().clone()
    }

    pub fn chat(&self) -> Vec<String> {
        self.surface.read().chat_lines()
    }
}
