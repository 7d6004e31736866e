use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::markdown::format_markdown;
use super::speech::{
    RecognitionSettings, SPEECH_UNSUPPORTED, Speaker, SpeechControl, SpeechRecognizer,
};
use super::transport::{ChatTransport, TransportError};
use super::typewriter::{TYPING_DELAY, type_out};
use super::view::{BubbleId, ChatView, Role, timestamp};

pub const THINKING: &str = "…thinking…";
pub const NO_REPLY: &str = "No reply (check server).";
pub const SEND_FAILED: &str = "Error contacting server.";
pub const MIC_ISSUE: &str = "🎙️ Mic issue or no speech detected";
pub const READY: &str = "Ready";
pub const STATUS_RESET_DELAY: Duration = Duration::from_secs(3);

/// Where the latest message came from. Only voice input gets a spoken reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputSource {
    #[default]
    Text,
    Voice,
}

/// Per-send progress: `Idle → AwaitingReply → (RenderingReply | ErrorShown) → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingReply,
    RenderingReply,
    ErrorShown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing rendered, nothing sent.
    Skipped,
    Replied,
    NoReply,
    Failed,
}

/// Interrupts whichever typing animation is currently running.
#[derive(Clone, Default)]
pub struct TypingHandle {
    current: Arc<Mutex<CancellationToken>>,
}

impl TypingHandle {
    pub fn interrupt(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    fn restart(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = token.clone();
        token
    }
}

pub struct ChatController<V, T> {
    view: V,
    transport: T,
    speaker: Speaker,
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    last_input: InputSource,
    phase: Phase,
    typing: TypingHandle,
    typing_delay: Duration,
    status_reset_at: Option<Instant>,
}

impl<V, T> ChatController<V, T>
where
    V: ChatView,
    T: ChatTransport,
{
    pub fn new(
        view: V,
        transport: T,
        speaker: Speaker,
        mut recognizer: Option<Box<dyn SpeechRecognizer>>,
    ) -> Self {
        if let Some(r) = recognizer.as_mut() {
            r.configure(&RecognitionSettings::default());
        }
        Self {
            view,
            transport,
            speaker,
            recognizer,
            last_input: InputSource::Text,
            phase: Phase::Idle,
            typing: TypingHandle::default(),
            typing_delay: TYPING_DELAY,
            status_reset_at: None,
        }
    }

    pub fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn last_input(&self) -> InputSource {
        self.last_input
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn typing_handle(&self) -> TypingHandle {
        self.typing.clone()
    }

    pub fn speech_control(&self) -> SpeechControl {
        match self.recognizer {
            Some(_) => SpeechControl::Enabled,
            None => SpeechControl::Disabled {
                label: SPEECH_UNSUPPORTED,
            },
        }
    }

    /// Send button or Ctrl/Cmd+Enter.
    pub async fn submit_text(&mut self, text: &str) -> SendOutcome {
        self.last_input = InputSource::Text;
        self.send_message(text).await
    }

    /// Microphone button.
    pub fn start_listening(&mut self) {
        let Some(recognizer) = self.recognizer.as_mut() else {
            return;
        };
        self.last_input = InputSource::Voice;
        if let Err(e) = recognizer.start() {
            warn!("{}", e);
        }
    }

    /// A finished utterance: fills the input and sends it as voice input, so
    /// the reply is spoken even if text was typed while the mic was open.
    pub async fn on_recognition_result(&mut self, transcript: &str) -> SendOutcome {
        self.last_input = InputSource::Voice;
        self.view.set_input(transcript);
        self.send_message(transcript).await
    }

    pub fn on_recognition_error(&mut self, error: &str, now: Instant) {
        warn!("Speech recognition problem: {}", error);
        self.view.set_status(MIC_ISSUE);
        self.status_reset_at = Some(now + STATUS_RESET_DELAY);
    }

    /// Puts the status line back to ready once the error message has had its time.
    pub fn refresh_status(&mut self, now: Instant) {
        if self.status_reset_at.is_some_and(|at| now >= at) {
            self.status_reset_at = None;
            self.view.set_status(READY);
        }
    }

    /// Speak control on a finished bot bubble.
    pub fn speak(&mut self, text: &str) {
        self.speaker.speak(text);
    }

    pub fn stop_speaking(&mut self) {
        self.speaker.stop();
    }

    /// Voices-changed notification from the platform.
    pub fn refresh_voices(&mut self) {
        self.speaker.refresh_voices();
    }

    pub async fn send_message(&mut self, message: &str) -> SendOutcome {
        let text = message.trim();
        if text.is_empty() {
            return SendOutcome::Skipped;
        }

        self.append(Role::User, text);
        self.view.set_input("");
        self.append(Role::Bot, THINKING);
        self.enter(Phase::AwaitingReply);

        let result = self.transport.send_chat(text).await;
        self.remove_placeholder();

        let outcome = match result {
            Ok(reply) => {
                self.enter(Phase::RenderingReply);
                let speak = self.last_input == InputSource::Voice;
                self.type_bot_message(&reply, speak).await;
                SendOutcome::Replied
            }
            Err(TransportError::NoReply) => {
                self.enter(Phase::ErrorShown);
                self.append(Role::Bot, NO_REPLY);
                SendOutcome::NoReply
            }
            Err(e) => {
                warn!("sendMessage error: {}", e);
                self.enter(Phase::ErrorShown);
                self.append(Role::Bot, SEND_FAILED);
                SendOutcome::Failed
            }
        };

        self.enter(Phase::Idle);
        outcome
    }

    /// Types `text` into a fresh bot bubble. An interrupted animation still
    /// leaves the full reply on screen. Returns whether the animation ran to
    /// the end.
    pub async fn type_bot_message(&mut self, text: &str, auto_speak: bool) -> bool {
        let cancel = self.typing.restart();
        let id = self.append(Role::Bot, "");

        let view = &mut self.view;
        let completed = type_out(text, self.typing_delay, &cancel, |frame| {
            view.set_bubble_html(id, &format_markdown(frame));
        })
        .await;

        self.view.set_bubble_html(id, &format_markdown(text));
        self.view.add_speak_button(id, text);

        if auto_speak {
            self.speaker.speak(text);
        }
        completed
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.view.set_phase(phase);
    }

    fn append(&mut self, role: Role, text: &str) -> BubbleId {
        self.view.append_bubble(role, &format_markdown(text), &timestamp())
    }

    fn remove_placeholder(&mut self) {
        if let Some((id, text)) = self.view.last_bot_bubble() {
            if text.contains(THINKING) {
                self.view.remove_bubble(id);
            }
        }
    }
}
