use thiserror::Error;
use tracing::debug;

use super::markdown::strip_bold_markers;

/// Voice picked when the platform offers it.
pub const PREFERRED_VOICE: &str = "Google US English";
pub const SPEECH_UNSUPPORTED: &str = "Speech not supported in this browser";

/// A platform voice, matched by name only.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    /// `None` means the platform default.
    pub voice: Option<Voice>,
}

/// Platform text-to-speech.
pub trait SpeechSynthesizer: Send {
    fn voices(&self) -> Vec<Voice>;
    fn is_speaking(&self) -> bool;
    fn cancel(&mut self);
    fn speak(&mut self, utterance: Utterance);
}

/// Wraps an optional synthesizer together with its cached voice list.
pub struct Speaker {
    synth: Option<Box<dyn SpeechSynthesizer>>,
    voices: Vec<Voice>,
}

impl Speaker {
    pub fn new(synth: Option<Box<dyn SpeechSynthesizer>>) -> Self {
        let mut speaker = Self {
            synth,
            voices: Vec::new(),
        };
        speaker.refresh_voices();
        speaker
    }

    pub fn silent() -> Self {
        Self::new(None)
    }

    /// Re-read the platform voice list; voices can arrive after page load.
    pub fn refresh_voices(&mut self) {
        if let Some(synth) = &self.synth {
            self.voices = synth.voices();
        }
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn speak(&mut self, text: &str) {
        let Some(synth) = self.synth.as_mut() else {
            return;
        };
        if synth.is_speaking() {
            synth.cancel();
        }

        let voice = self
            .voices
            .iter()
            .find(|v| v.name.contains(PREFERRED_VOICE))
            .cloned();
        debug!(voice = ?voice.as_ref().map(|v| &v.name), "speaking reply");

        synth.speak(Utterance {
            text: strip_bold_markers(text),
            rate: 1.0,
            pitch: 1.0,
            voice,
        });
    }

    pub fn stop(&mut self) {
        if let Some(synth) = self.synth.as_mut() {
            if synth.is_speaking() {
                synth.cancel();
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionSettings {
    pub lang: String,
    pub continuous: bool,
    pub interim_results: bool,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
            continuous: false,
            interim_results: false,
        }
    }
}

#[derive(Debug, Error)]
#[error("speech recognition failed to start: {0}")]
pub struct RecognitionError(pub String);

/// Platform speech-to-text. Results and errors come back through
/// [`ChatController::on_recognition_result`](super::ChatController::on_recognition_result)
/// and [`ChatController::on_recognition_error`](super::ChatController::on_recognition_error).
pub trait SpeechRecognizer: Send {
    fn configure(&mut self, settings: &RecognitionSettings);
    fn start(&mut self) -> Result<(), RecognitionError>;
}

/// State of the microphone button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechControl {
    Enabled,
    Disabled { label: &'static str },
}
