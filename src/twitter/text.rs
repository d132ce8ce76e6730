//! Small text helpers shared by the extractors and the pipeline logs.

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_chars`: Maximum number of characters kept before truncation
///
/// # Returns
///
/// A single-line string safe for logging
pub(crate) fn sanitize_for_logging(text: &str, max_chars: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_chars {
        format!(
            "{}... [truncated, {} total bytes]",
            truncate_chars(&sanitized, max_chars),
            text.len()
        )
    } else {
        sanitized
    }
}

/// Returns at most `max_chars` characters of `text`, never splitting a character.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Joins the whitespace-separated words of `text` with single spaces.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True for strings shaped like a Twitter handle: 1 to 15 word characters.
pub(crate) fn is_handle(candidate: &str) -> bool {
    let len = candidate.chars().count();
    (1..=15).contains(&len) && candidate.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
