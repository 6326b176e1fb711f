// Output formatting — terminal display of finished runs.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..."
/// if truncated. Counts characters rather than bytes so multi-byte terms
/// never split mid-character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
