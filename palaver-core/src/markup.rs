//! Markup escaping for player-supplied text.

/// Escape markup control characters so player text renders literally.
///
/// Backslashes are doubled and opening brackets are prefixed with a
/// backslash, matching the client's markup parser.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '[' => out.push_str("\\["),
            other => out.push(other),
        }
    }
    out
}
