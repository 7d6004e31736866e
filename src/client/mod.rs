//! Chat page controller: everything the browser page does, minus the DOM.
//!
//! Rendering, networking and speech are each reached through a narrow trait
//! so the controller runs the same against a terminal, a browser bridge or
//! in-memory fakes.

pub mod controller;
pub mod markdown;
pub mod speech;
pub mod transport;
pub mod typewriter;
pub mod view;

pub use controller::{ChatController, InputSource, Phase, SendOutcome, TypingHandle};
pub use markdown::{format_markdown, strip_bold_markers};
pub use speech::{
    RecognitionSettings, Speaker, SpeechControl, SpeechRecognizer, SpeechSynthesizer, Utterance,
    Voice,
};
pub use transport::{ChatTransport, HttpTransport, TransportError};
pub use view::{BubbleId, ChatView, Role};
