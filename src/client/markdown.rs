use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern compiles"));

/// Renders `**text**` as `<b>text</b>`. Nothing else is interpreted; the rest
/// of the input passes through as raw markup.
pub fn format_markdown(text: &str) -> String {
    BOLD.replace_all(text, "<b>${1}</b>").into_owned()
}

/// Drops the bold delimiters so they are not read aloud.
pub fn strip_bold_markers(text: &str) -> String {
    text.replace("**", "")
}
