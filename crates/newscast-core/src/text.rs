//! Text helpers shared by the composer and the timing controller.

/// Count whitespace-separated words.
///
/// This is the single word counter used both when sizing a script request and
/// when deriving the observed speech rate from a rendered script, so the two
/// sides of the timing loop agree on what a "word" is.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Truncate `text` to at most `max_chars` characters on a char boundary,
/// appending `...` when anything was cut.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", text[..idx].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_ignores_repeated_whitespace() {
        assert_eq!(word_count("  Good   evening,\n I'm\tNoah. "), 4);
    }

    #[test]
    fn word_count_of_empty_is_zero() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n"), 0);
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn truncate_cuts_on_char_boundary() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
    }
}
