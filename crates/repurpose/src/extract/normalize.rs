//! Text normalization

/// Whitespace as seen by the normalizer: Unicode `White_Space` plus the BOM
fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Collapse every whitespace run (newlines included) to a single space and
/// trim both ends. The output contains no blank lines and is a fixed point:
/// `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split(is_space).filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Cut `text` to at most `max_chars` characters. Returns the text and
/// whether anything was dropped. Whitespace left dangling by the cut is
/// trimmed.
pub fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (text[..byte_idx].trim_end_matches(is_space).to_string(), true),
        None => (text.to_string(), false),
    }
}
