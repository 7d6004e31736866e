use chrono::Local;

use super::controller::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BubbleId(pub u64);

/// The rendering surface of the chat page.
///
/// `html` arguments are already passed through
/// [`format_markdown`](super::format_markdown).
pub trait ChatView {
    /// Append a bubble at the bottom of the list and keep it scrolled into view.
    fn append_bubble(&mut self, role: Role, html: &str, timestamp: &str) -> BubbleId;

    fn set_bubble_html(&mut self, id: BubbleId, html: &str);

    /// Removing a bubble that is already gone is a no-op.
    fn remove_bubble(&mut self, id: BubbleId);

    /// The most recent bot bubble and its visible text.
    fn last_bot_bubble(&self) -> Option<(BubbleId, String)>;

    /// Attach a "🔊 Speak" control that replays `text`.
    fn add_speak_button(&mut self, id: BubbleId, text: &str);

    fn set_input(&mut self, text: &str);

    fn set_status(&mut self, text: &str);

    /// Called on every send-cycle transition. Views that don't show progress
    /// can ignore it.
    fn set_phase(&mut self, _phase: Phase) {}
}

/// Wall-clock `HH:MM` label shown under each bubble.
pub fn timestamp() -> String {
    Local::now().format("%H:%M").to_string()
}
