/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Remove an echoed prompt from a completion.
///
/// Some inference backends return `prompt + completion`. Returns the
/// completion untouched when nothing is left after stripping.
pub fn strip_echoed_prompt(completion: &str, prompt: &str) -> String {
    let stripped = if prompt.is_empty() {
        completion.trim().to_string()
    } else {
        completion.replace(prompt, "").trim().to_string()
    };
    if stripped.is_empty() {
        completion.to_string()
    } else {
        stripped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_char_boundary() {
        let text = "Hello 世界";
        let truncated = truncate_to_char_boundary(text, 8);
        assert!(truncated.len() <= 8);
        assert!(text.starts_with(truncated));
    }

    #[test]
    fn test_truncate_within_bounds() {
        let text = "Hello";
        assert_eq!(truncate_to_char_boundary(text, 100), "Hello");
    }

    #[test]
    fn test_strip_echoed_prompt() {
        assert_eq!(
            strip_echoed_prompt("Write about X\n\nHere is X.", "Write about X"),
            "Here is X."
        );
        assert_eq!(strip_echoed_prompt("  just text ", "absent"), "just text");
    }

    #[test]
    fn test_strip_echo_only_keeps_original() {
        assert_eq!(strip_echoed_prompt(" Write about X ", "Write about X"), " Write about X ");
    }
}
