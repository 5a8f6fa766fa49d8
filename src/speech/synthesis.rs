//! Speech synthesis contract and the at-most-one output slot

use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Voices whose name contains one of these are preferred.
pub const MASCULINE_VOICE_NAMES: &[&str] = &[
    "David", "Mike", "Alex", "Brian", "James", "John", "Robert", "William", "George", "Mark",
    "Paul", "Tom", "Richard", "Daniel", "Matthew", "Andrew", "Steven", "Kevin", "Jason", "Eric",
    "Ryan", "Scott", "Anthony", "Patrick", "Benjamin", "Samuel", "Gregory", "Larry", "Frank",
    "Jonathan", "Justin", "Aaron", "Kyle", "Dylan", "Ethan", "Jordan", "Tyler", "Chad", "Travis",
    "Cameron", "Derek", "Shawn", "Phillip", "Neil", "Gordon", "Harold", "Leonard", "Michael",
    "Victor", "Wesley", "Zack", "Zachary", "Zane", "Zeke",
];

/// A voice offered by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Display name, e.g. `Daniel`
    pub name: String,
    /// Language tag, e.g. `en-GB` or `en_US`
    pub language: String,
    /// What the engine needs to select this voice
    pub identifier: String,
}

impl Voice {
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            identifier: identifier.into(),
        }
    }

    fn has_language(&self, prefix: &str) -> bool {
        self.language
            .to_ascii_lowercase()
            .starts_with(&prefix.to_ascii_lowercase())
    }
}

/// Pick a voice: a curated masculine name in the wanted language, else the
/// first voice in that language, else `None` (engine default).
pub fn select_voice<'a>(voices: &'a [Voice], language_prefix: &str) -> Option<&'a Voice> {
    voices
        .iter()
        .find(|v| {
            v.has_language(language_prefix)
                && MASCULINE_VOICE_NAMES.iter().any(|name| v.name.contains(name))
        })
        .or_else(|| voices.iter().find(|v| v.has_language(language_prefix)))
}

/// Multipliers relative to the engine's neutral settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prosody {
    pub pitch: f32,
    pub rate: f32,
    pub volume: f32,
}

impl Default for Prosody {
    fn default() -> Self {
        Self {
            pitch: 1.0,
            rate: 0.95,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub voice: Option<Voice>,
    pub prosody: Prosody,
}

/// Lifecycle events reported by an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisEvent {
    Started(UtteranceId),
    /// Emitted both on natural completion and on cancellation
    Ended(UtteranceId),
}

/// A speech synthesizer
pub trait SpeechEngine: Send {
    /// Voices available to [`SpeechEngine::speak`]
    fn voices(&self) -> Vec<Voice>;

    /// Start speaking. Lifecycle events arrive on the engine's event channel.
    fn speak(&mut self, utterance: Utterance) -> Result<()>;

    /// Stop the active utterance, if any.
    fn cancel(&mut self);
}

/// The single synthesis slot
///
/// Every `speak` cancels whatever is in flight first, so at most one
/// utterance is ever active. Without an engine every call is a no-op.
pub struct SpeechOutput {
    engine: Option<Box<dyn SpeechEngine>>,
    voices: Vec<Voice>,
    language_prefix: String,
    prosody: Prosody,
    current: Option<UtteranceId>,
    next_id: u64,
}

impl SpeechOutput {
    pub fn new(engine: Box<dyn SpeechEngine>, prosody: Prosody, language_prefix: &str) -> Self {
        let voices = engine.voices();
        debug!("Speech engine offers {} voices", voices.len());
        Self {
            engine: Some(engine),
            voices,
            language_prefix: language_prefix.to_string(),
            prosody,
            current: None,
            next_id: 1,
        }
    }

    /// Output with no engine behind it
    pub fn disabled() -> Self {
        Self {
            engine: None,
            voices: Vec::new(),
            language_prefix: "en".to_string(),
            prosody: Prosody::default(),
            current: None,
            next_id: 1,
        }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    pub fn selected_voice(&self) -> Option<&Voice> {
        select_voice(&self.voices, &self.language_prefix)
    }

    /// Utterance occupying the slot
    pub fn current(&self) -> Option<UtteranceId> {
        self.current
    }

    pub fn is_current(&self, id: UtteranceId) -> bool {
        self.current == Some(id)
    }

    /// Cancel the active utterance. Returns whether one was in flight.
    pub fn cancel(&mut self) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        engine.cancel();
        self.current.take().is_some()
    }

    /// Replace whatever is being spoken with `text`.
    pub fn speak(&mut self, text: &str) -> Option<UtteranceId> {
        if self.engine.is_none() || text.trim().is_empty() {
            return None;
        }
        self.cancel();

        let id = UtteranceId(self.next_id);
        self.next_id += 1;
        let utterance = Utterance {
            id,
            text: text.to_string(),
            voice: self.selected_voice().cloned(),
            prosody: self.prosody,
        };

        let engine = self.engine.as_mut()?;
        match engine.speak(utterance) {
            Ok(()) => {
                self.current = Some(id);
                Some(id)
            }
            Err(e) => {
                warn!("Speech synthesis failed: {}", e);
                None
            }
        }
    }

    /// Mark `id` finished. Returns false for a stale id.
    pub fn finish(&mut self, id: UtteranceId) -> bool {
        if self.is_current(id) {
            self.current = None;
            true
        } else {
            false
        }
    }
}
