//! Text helpers shared across services.

/// Collapse whitespace runs into single spaces and trim the ends.
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pick the contest question out of a block of page text.
///
/// The question is the first line that contains a question mark and whose
/// normalized length falls in the 5..=400 character window.
pub fn pick_question_line(text: &str) -> Option<String> {
    for line in text.lines() {
        let line = normalize_ws(line);
        if !line.contains('?') {
            continue;
        }
        let len = line.chars().count();
        if (5..=400).contains(&len) {
            return Some(line);
        }
    }
    None
}

/// Truncate long text for log display.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// Cap a string at `max_len` characters without an ellipsis.
pub fn cap_chars(text: &str, max_len: usize) -> String {
    text.chars().take(max_len).collect()
}

/// Percent-encode a string for use as a URL query value (spaces become `+`).
pub fn encode_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(*byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
