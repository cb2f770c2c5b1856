//! Shared utility functions.

/// Truncate a string to at most `max_bytes` bytes without splitting a UTF-8
/// character.
///
/// Used for conversation titles and log previews. Returns the whole string
/// when it already fits.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_unchanged() {
        assert_eq!(truncate_str("hi", 40), "hi");
        assert_eq!(truncate_str("", 5), "");
    }

    #[test]
    fn cuts_at_byte_limit() {
        assert_eq!(truncate_str("what is the capital of france", 7), "what is");
    }

    #[test]
    fn never_splits_a_multibyte_char() {
        // 'é' is two bytes; cutting at 4 lands inside it and must back up
        let s = "caféine";
        assert_eq!(truncate_str(s, 4), "caf");
        assert_eq!(truncate_str(s, 5), "café");
    }
}
