//! Synthesis through the platform speech program
//!
//! Uses `espeak-ng`, `espeak` or macOS `say`, one child process per
//! utterance. A watcher thread reports `Ended` when the child exits.

use super::synthesis::{Prosody, SpeechEngine, SynthesisEvent, Utterance, UtteranceId, Voice};
use crate::utils::Repaint;
use crate::{HudError, Result};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Words per minute at rate 1.0
const BASE_WPM: f32 = 175.0;
/// espeak pitch at 1.0 on its 0-99 scale
const BASE_PITCH: f32 = 50.0;
/// espeak amplitude at volume 1.0
const BASE_AMPLITUDE: f32 = 100.0;
const WATCH_INTERVAL: Duration = Duration::from_millis(50);

/// Which synthesizer to look for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineChoice {
    /// First of espeak-ng, espeak, say that responds
    #[default]
    Auto,
    Espeak,
    Say,
    /// Synthesis disabled
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechProgram {
    EspeakNg,
    Espeak,
    Say,
}

impl SpeechProgram {
    pub fn binary(&self) -> &'static str {
        match self {
            SpeechProgram::EspeakNg => "espeak-ng",
            SpeechProgram::Espeak => "espeak",
            SpeechProgram::Say => "say",
        }
    }

    fn candidates(choice: EngineChoice) -> &'static [SpeechProgram] {
        match choice {
            EngineChoice::Auto => &[
                SpeechProgram::EspeakNg,
                SpeechProgram::Espeak,
                SpeechProgram::Say,
            ],
            EngineChoice::Espeak => &[SpeechProgram::EspeakNg, SpeechProgram::Espeak],
            EngineChoice::Say => &[SpeechProgram::Say],
            EngineChoice::None => &[],
        }
    }

    fn list_voices_args(&self) -> &'static [&'static str] {
        match self {
            SpeechProgram::EspeakNg | SpeechProgram::Espeak => &["--voices"],
            SpeechProgram::Say => &["-v", "?"],
        }
    }

    fn parse_voices(&self, stdout: &str) -> Vec<Voice> {
        match self {
            SpeechProgram::EspeakNg | SpeechProgram::Espeak => parse_espeak_voices(stdout),
            SpeechProgram::Say => parse_say_voices(stdout),
        }
    }

    /// Arguments for speaking `utterance`
    pub fn speak_args(&self, utterance: &Utterance) -> Vec<String> {
        let Prosody {
            pitch,
            rate,
            volume,
        } = utterance.prosody;
        let wpm = (BASE_WPM * rate).round().clamp(80.0, 450.0) as u32;
        let text = normalize_text_for_speech(&utterance.text);

        let mut args = Vec::new();
        if let Some(voice) = &utterance.voice {
            args.push("-v".to_string());
            args.push(voice.identifier.clone());
        }

        match self {
            SpeechProgram::EspeakNg | SpeechProgram::Espeak => {
                let pitch = (BASE_PITCH * pitch).round().clamp(0.0, 99.0) as u32;
                let amplitude = (BASE_AMPLITUDE * volume).round().clamp(0.0, 200.0) as u32;
                args.extend([
                    "-s".to_string(),
                    wpm.to_string(),
                    "-p".to_string(),
                    pitch.to_string(),
                    "-a".to_string(),
                    amplitude.to_string(),
                ]);
            }
            SpeechProgram::Say => {
                args.extend(["-r".to_string(), wpm.to_string()]);
            }
        }

        args.push(text);
        args
    }
}

/// Parse the `espeak --voices` table:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  2  en-gb           --/M      English_(Great_Britain) gmw/en          (en 2)
/// ```
pub fn parse_espeak_voices(stdout: &str) -> Vec<Voice> {
    stdout
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Pty"))
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 4 {
                return None;
            }
            let language = cols[1];
            Some(Voice::new(cols[3].replace('_', " "), language, language))
        })
        .collect()
}

/// Parse `say -v ?` lines such as `Daniel              en_GB    # Hello! My name is Daniel.`
pub fn parse_say_voices(stdout: &str) -> Vec<Voice> {
    stdout
        .lines()
        .filter_map(|line| {
            let head = line.split('#').next()?.trim();
            let (name, language) = head.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() || language.is_empty() {
                return None;
            }
            Some(Voice::new(name, language, name))
        })
        .collect()
}

/// Spell out symbols the synthesizer reads badly and flatten the text onto
/// one line.
pub fn normalize_text_for_speech(text: &str) -> String {
    let replaced = text
        .replace("°C", " degrees")
        .replace('°', " degrees")
        .replace('%', " percent")
        .replace('&', " and ");

    replaced
        .lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

struct ActiveUtterance {
    id: UtteranceId,
    child: Child,
}

type ActiveSlot = Arc<Mutex<Option<ActiveUtterance>>>;

/// [`SpeechEngine`] backed by a speech program
pub struct SystemSpeechEngine {
    program: SpeechProgram,
    voices: Vec<Voice>,
    active: ActiveSlot,
    events: Sender<SynthesisEvent>,
    repaint: Repaint,
}

impl SystemSpeechEngine {
    /// Probe the candidate programs once and keep the first that lists its
    /// voices. `None` means synthesis is unavailable.
    pub fn detect(
        choice: EngineChoice,
        events: Sender<SynthesisEvent>,
        repaint: Repaint,
    ) -> Option<Self> {
        for &program in SpeechProgram::candidates(choice) {
            match Command::new(program.binary())
                .args(program.list_voices_args())
                .stdin(Stdio::null())
                .output()
            {
                Ok(output) if output.status.success() => {
                    let voices = program.parse_voices(&String::from_utf8_lossy(&output.stdout));
                    info!(
                        "Speech synthesis via {} ({} voices)",
                        program.binary(),
                        voices.len()
                    );
                    return Some(Self {
                        program,
                        voices,
                        active: Arc::new(Mutex::new(None)),
                        events,
                        repaint,
                    });
                }
                Ok(output) => debug!("{} exited with {}", program.binary(), output.status),
                Err(e) => debug!("{} not available: {}", program.binary(), e),
            }
        }

        warn!("No speech synthesis program found, voice output disabled");
        None
    }

    pub fn program(&self) -> SpeechProgram {
        self.program
    }

    fn emit(&self, event: SynthesisEvent) {
        emit(&self.events, &self.repaint, event);
    }

    fn watch(&self, id: UtteranceId) {
        let active = self.active.clone();
        let events = self.events.clone();
        let repaint = self.repaint.clone();

        thread::spawn(move || loop {
            thread::sleep(WATCH_INTERVAL);

            let mut slot = active.lock();
            let finished = match slot.as_mut() {
                Some(current) if current.id == id => {
                    !matches!(current.child.try_wait(), Ok(None))
                }
                // Cancelled or replaced; whoever did that reported Ended
                _ => return,
            };

            if finished {
                *slot = None;
                drop(slot);
                emit(&events, &repaint, SynthesisEvent::Ended(id));
                return;
            }
        });
    }
}

fn emit(events: &Sender<SynthesisEvent>, repaint: &Repaint, event: SynthesisEvent) {
    if events.send(event).is_err() {
        debug!("Synthesis event receiver dropped");
    }
    repaint();
}

impl SpeechEngine for SystemSpeechEngine {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&mut self, utterance: Utterance) -> Result<()> {
        self.cancel();

        let child = Command::new(self.program.binary())
            .args(self.program.speak_args(&utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| HudError::Speech(format!("{}: {}", self.program.binary(), e)))?;

        let id = utterance.id;
        *self.active.lock() = Some(ActiveUtterance { id, child });
        self.emit(SynthesisEvent::Started(id));
        self.watch(id);
        Ok(())
    }

    fn cancel(&mut self) {
        let taken = self.active.lock().take();
        if let Some(mut active) = taken {
            if let Err(e) = active.child.kill() {
                debug!("Speech process already gone: {}", e);
            }
            let _ = active.child.wait();
            self.emit(SynthesisEvent::Ended(active.id));
        }
    }
}

impl Drop for SystemSpeechEngine {
    fn drop(&mut self) {
        if let Some(mut active) = self.active.lock().take() {
            let _ = active.child.kill();
            let _ = active.child.wait();
        }
    }
}
