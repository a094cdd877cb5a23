//! Text shaping for outgoing replies and log lines.

/// Hard cut to the first `max_chars` characters.
///
/// Not word-aware. Cuts on `char` boundaries so the result is always valid UTF-8.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Short single-line preview used when logging incoming text.
pub fn preview(text: &str, max_chars: usize) -> String {
    truncate_chars(text, max_chars).replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text_intact() {
        assert_eq!(truncate_chars("hello", 4096), "hello");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[test]
    fn truncate_is_a_hard_cut() {
        let s = "a".repeat(5000);
        assert_eq!(truncate_chars(&s, 4096).len(), 4096);
        assert_eq!(truncate_chars("hello world", 7), "hello w");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let s = "é".repeat(10);
        let t = truncate_chars(&s, 4);
        assert_eq!(t.chars().count(), 4);
        assert_eq!(t, "éééé");
    }

    #[test]
    fn preview_flattens_newlines() {
        assert_eq!(preview("line one\nline two", 100), "line one line two");
        assert_eq!(preview(&"x".repeat(300), 100).len(), 100);
    }
}
