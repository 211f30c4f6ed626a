//! Small text helpers shared across the domain.

/// Truncates a string to at most `max_chars` characters, appending an
/// ellipsis when anything was cut. Operates on characters, not bytes, so
/// multi-byte content is never split mid-codepoint.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
