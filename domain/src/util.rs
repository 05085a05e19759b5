//! Shared utility functions.

/// Shorten `s` to at most `max_chars` characters for log and error output,
/// marking the cut with an ellipsis.
pub fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((end, _)) => format!("{}…", &s[..end]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(preview("hi", 10), "hi");
        assert_eq!(preview("", 3), "");
    }

    #[test]
    fn long_text_is_cut_on_char_boundary() {
        assert_eq!(preview("hello world", 5), "hello…");
        assert_eq!(preview("あのね", 2), "あの…");
    }
}
