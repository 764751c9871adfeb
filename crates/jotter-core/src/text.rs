//! Text formatting helpers.

/// Format a list-row label: the first `max_len` characters of `text` with a
/// trailing `...` marker.
///
/// The marker is appended unconditionally; list rows render every title with
/// it, truncated or not. Truncation counts characters, not bytes, so
/// multibyte titles never split mid-character.
pub fn summarize(text: &str, max_len: usize) -> String {
    let mut label: String = text.chars().take(max_len).collect();
    label.push_str("...");
    label
}
