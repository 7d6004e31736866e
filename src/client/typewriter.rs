use std::str::CharIndices;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Pause between characters of the typing animation.
pub const TYPING_DELAY: Duration = Duration::from_millis(5);

/// Lazily yields every growing prefix of `text`, one character at a time.
///
/// Each call to [`Typewriter::new`] starts from scratch, so an animation can be
/// restarted simply by building a new one.
#[derive(Debug, Clone)]
pub struct Typewriter<'a> {
    text: &'a str,
    chars: CharIndices<'a>,
}

impl<'a> Typewriter<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices(),
        }
    }
}

impl<'a> Iterator for Typewriter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.chars
            .next()
            .map(|(i, c)| &self.text[..i + c.len_utf8()])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chars.size_hint()
    }
}

/// Feeds each frame of `text` to `render`, sleeping `delay` between frames.
///
/// Returns `false` if `cancel` fired before the last frame was shown.
pub async fn type_out<F>(
    text: &str,
    delay: Duration,
    cancel: &CancellationToken,
    mut render: F,
) -> bool
where
    F: FnMut(&str),
{
    for frame in Typewriter::new(text) {
        if cancel.is_cancelled() {
            return false;
        }
        render(frame);
        if delay.is_zero() {
            continue;
        }
        tokio::select! {
            _ = cancel.cancelled() => return false,
            _ = tokio::time::sleep(delay) => {}
        }
    }
    true
}
