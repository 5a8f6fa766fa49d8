//! The command and voice interaction coordinator
//!
//! Owns the dialogue state and turns every submitted utterance into exactly
//! one effect: an interrupt, a local overlay toggle or a remote request.
//! Engine and backend events are drained once per frame by
//! [`Coordinator::poll_events`].

use super::dialogue::DialogueState;
use super::rules::{self, Classification};
use crate::backend::{
    CommandBackend, CommandPurpose, CommandRequest, CommandResponse, RemoteEvent, RemoteOutcome,
};
use crate::messages::Sender;
use crate::speech::{RecognitionEvent, Recognizer, SpeechOutput, SynthesisEvent, UtteranceId};
use crate::ui::surface::SharedSurface;
use crossbeam_channel::{never, Receiver};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const OFFLINE_MESSAGE: &str = "Neural Link Offline.";
pub const CONNECTION_ERROR: &str = "CONNECTION ERROR";
pub const AUDIO_STOPPED: &str = "AUDIO STOPPED";
pub const LISTENING: &str = "LISTENING...";
pub const SYSTEM_ONLINE: &str = "SYSTEM ONLINE";

/// Start-up greeting
#[derive(Debug, Clone, PartialEq)]
pub struct GreetingSettings {
    /// Command whose response names the operator
    pub command: String,
    /// Names looked for in the response, case-insensitively
    pub known_names: Vec<String>,
    pub default_name: String,
    pub delay: Duration,
}

impl Default for GreetingSettings {
    fn default() -> Self {
        Self {
            command: "get user name".to_string(),
            known_names: vec!["Arish".to_string()],
            default_name: "Sir".to_string(),
            delay: Duration::from_millis(1000),
        }
    }
}

impl GreetingSettings {
    /// Name to greet with, given the backend's answer (if any)
    pub fn resolve_name(&self, message: Option<&str>) -> &str {
        let Some(message) = message else {
            return &self.default_name;
        };
        let message = message.to_lowercase();
        self.known_names
            .iter()
            .find(|name| !name.is_empty() && message.contains(&name.to_lowercase()))
            .map(String::as_str)
            .unwrap_or(&self.default_name)
    }

    pub fn greeting_line(name: &str) -> String {
        format!("Hey {}, what can I do for you today?", name)
    }
}

pub struct Coordinator {
    surface: SharedSurface,
    dialogue: DialogueState,
    speech: SpeechOutput,
    recognizer: Option<Box<dyn Recognizer>>,
    backend: Box<dyn CommandBackend>,
    remote_rx: Receiver<RemoteEvent>,
    synthesis_rx: Receiver<SynthesisEvent>,
    recognition_rx: Receiver<RecognitionEvent>,
    greeting: GreetingSettings,
}

impl Coordinator {
    /// Coordinator with no speech capabilities. Remote results arrive on
    /// `remote_rx`.
    pub fn new(
        surface: SharedSurface,
        backend: Box<dyn CommandBackend>,
        remote_rx: Receiver<RemoteEvent>,
    ) -> Self {
        {
            let mut s = surface.write();
            s.speech_available = false;
            s.voice.available = false;
        }
        Self {
            surface,
            dialogue: DialogueState::new(),
            speech: SpeechOutput::disabled(),
            recognizer: None,
            backend,
            remote_rx,
            synthesis_rx: never(),
            recognition_rx: never(),
            greeting: GreetingSettings::default(),
        }
    }

    pub fn with_speech(mut self, speech: SpeechOutput, events: Receiver<SynthesisEvent>) -> Self {
        self.surface.write().speech_available = speech.is_available();
        self.speech = speech;
        self.synthesis_rx = events;
        self
    }

    pub fn with_recognizer(
        mut self,
        recognizer: Box<dyn Recognizer>,
        events: Receiver<RecognitionEvent>,
    ) -> Self {
        self.surface.write().voice.available = true;
        self.recognizer = Some(recognizer);
        self.recognition_rx = events;
        self
    }

    pub fn with_greeting(mut self, greeting: GreetingSettings) -> Self {
        self.greeting = greeting;
        self
    }

    pub fn dialogue(&self) -> DialogueState {
        self.dialogue
    }

    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }

    pub fn speech(&self) -> &SpeechOutput {
        &self.speech
    }

    pub fn voice_available(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Submit whatever is in the input buffer.
    pub fn submit_input(&mut self) -> Option<Classification> {
        let raw = self.surface.read().input.clone();
        self.submit(&raw)
    }

    /// Record the utterance in the chat, clear the input and dispatch it.
    /// Blank input is ignored.
    pub fn submit(&mut self, raw: &str) -> Option<Classification> {
        let typed = raw.trim();
        if typed.is_empty() {
            return None;
        }

        {
            let mut surface = self.surface.write();
            surface.append_chat(Sender::Operator, typed);
            surface.clear_input();
        }

        Some(self.dispatch(&rules::normalize(typed)))
    }

    /// Act on a normalized command.
    pub fn dispatch(&mut self, command: &str) -> Classification {
        let classification = rules::classify(command);
        debug!("{:?} -> {:?}", command, classification);

        match classification {
            Classification::Interrupt => {
                self.stop_speaking();
                self.surface.write().notify(AUDIO_STOPPED);
            }
            Classification::LocalOverlayToggle { target, show } => {
                self.surface.write().set_overlay(target, show);
                self.speak(rules::acknowledgement(target, show));
                if show {
                    self.surface.write().notify(rules::shown_notification(target));
                }
            }
            Classification::RemoteForward => {
                self.backend.send(CommandRequest::dispatch(command));
            }
        }

        classification
    }

    /// Show and speak a backend response.
    pub fn handle_remote_result(&mut self, response: &CommandResponse) {
        self.surface
            .write()
            .append_chat(Sender::Assistant, response.message.as_str());
        self.speak(&response.message);

        if response.is_success() {
            if let Some(title) = response.top_title() {
                self.surface
                    .write()
                    .append_chat(Sender::Assistant, format!("Result: {}", title));
            }
        }
    }

    /// The remote call could not complete. Shown, never spoken.
    pub fn on_transport_failure(&mut self) {
        let mut surface = self.surface.write();
        surface.append_chat(Sender::Assistant, OFFLINE_MESSAGE);
        surface.notify(CONNECTION_ERROR);
    }

    /// Speak `text`, replacing anything currently being spoken.
    pub fn speak(&mut self, text: &str) -> Option<UtteranceId> {
        if self.speech.cancel() {
            self.set_speaking(false);
        }
        self.speech.speak(text)
    }

    /// Cancel any in-flight utterance.
    pub fn stop_speaking(&mut self) {
        self.speech.cancel();
        self.set_speaking(false);
    }

    fn set_speaking(&mut self, speaking: bool) {
        self.dialogue.is_speaking = speaking;
        self.surface.write().waveform_active = speaking;
    }

    fn set_listening(&mut self, listening: bool) {
        self.dialogue.is_listening = listening;
        self.surface.write().voice.listening = listening;
    }

    /// Start or stop recognition. Returns false when recognition is
    /// unavailable.
    pub fn toggle_listening(&mut self) -> bool {
        let Some(recognizer) = self.recognizer.as_mut() else {
            debug!("Voice input unavailable");
            return false;
        };

        if self.dialogue.is_listening {
            recognizer.stop();
        } else if let Err(e) = recognizer.start() {
            warn!("Could not start recognition: {}", e);
            self.set_listening(false);
            self.surface.write().notify(e.user_message());
        }
        true
    }

    /// Ask the backend who the operator is; the greeting follows the answer.
    pub fn greet(&mut self) {
        info!("Requesting greeting");
        self.backend.send(CommandRequest::greeting(
            self.greeting.command.clone(),
            self.greeting.delay,
        ));
    }

    fn handle_greeting(&mut self, outcome: &RemoteOutcome) {
        let message = match outcome {
            RemoteOutcome::Response(response) => Some(response.message.as_str()),
            RemoteOutcome::TransportFailure(_) => None,
        };
        let line = GreetingSettings::greeting_line(self.greeting.resolve_name(message));

        {
            let mut surface = self.surface.write();
            surface.notify(SYSTEM_ONLINE);
            surface.append_chat(Sender::Assistant, line.as_str());
        }
        self.speak(&line);
    }

    /// Drain pending engine and backend events.
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.recognition_rx.try_recv() {
            self.handle_recognition(event);
        }
        while let Ok(event) = self.synthesis_rx.try_recv() {
            self.handle_synthesis(event);
        }
        while let Ok(event) = self.remote_rx.try_recv() {
            self.handle_remote(event);
        }
    }

    fn handle_recognition(&mut self, event: RecognitionEvent) {
        if event.is_terminal() {
            if let RecognitionEvent::Error(message) = &event {
                warn!("Recognition error: {}", message);
            }
            self.set_listening(false);
            return;
        }

        match event {
            RecognitionEvent::Started => {
                self.set_listening(true);
                self.surface.write().notify(LISTENING);
            }
            RecognitionEvent::Transcript { text, is_final } => {
                self.surface.write().set_input(text.as_str());
                if is_final {
                    self.submit(&text);
                }
            }
            RecognitionEvent::Ended | RecognitionEvent::Error(_) => {}
        }
    }

    fn handle_synthesis(&mut self, event: SynthesisEvent) {
        match event {
            SynthesisEvent::Started(id) if self.speech.is_current(id) => self.set_speaking(true),
            SynthesisEvent::Ended(id) if self.speech.finish(id) => self.set_speaking(false),
            stale => debug!("Ignoring stale synthesis event {:?}", stale),
        }
    }

    fn handle_remote(&mut self, event: RemoteEvent) {
        match (event.purpose, &event.outcome) {
            (CommandPurpose::Greeting, outcome) => self.handle_greeting(outcome),
            (CommandPurpose::Dispatch, RemoteOutcome::Response(response)) => {
                self.handle_remote_result(response)
            }
            (CommandPurpose::Dispatch, RemoteOutcome::TransportFailure(reason)) => {
                debug!("Transport failure: {}", reason);
                self.on_transport_failure();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_name() {
        let greeting = GreetingSettings::default();
        assert_eq!(greeting.resolve_name(Some("Your name is Arish")), "Arish");
        assert_eq!(greeting.resolve_name(Some("user: ARISH K")), "Arish");
        assert_eq!(greeting.resolve_name(Some("unknown user")), "Sir");
        assert_eq!(greeting.resolve_name(None), "Sir");
    }

    #[test]
    fn test_greeting_line() {
        assert_eq!(
            GreetingSettings::greeting_line("Sir"),
            "Hey Sir, what can I do for you today?"
        );
    }
}
