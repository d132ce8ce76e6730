//! Tweet identifier normalization.
//!
//! Accepts either a tweet URL on `twitter.com` / `x.com` or a bare numeric id and
//! returns the numeric id.

use thiserror::Error;

/// Returned when the input is neither a tweet URL nor a numeric tweet id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid tweet URL or ID format: '{input}'")]
pub struct InvalidIdentifier {
    /// The rejected input, as supplied
    pub input: String,
}

/// Converts a tweet URL or bare numeric id into the canonical numeric id.
///
/// # Parameters
///
/// - `input`: A URL such as `https://x.com/jack/status/20` or an id such as `20`
///
/// # Returns
///
/// - `Ok(String)`: The digits of the tweet id
/// - `Err(InvalidIdentifier)`: If the input matches neither shape
///
/// # Example
///
/// ```rust
/// use tweetcheck::normalize;
///
/// assert_eq!(normalize("https://x.com/jack/status/20").unwrap(), "20");
/// assert_eq!(normalize("20").unwrap(), "20");
/// assert!(normalize("jack").is_err());
/// ```
pub fn normalize(input: &str) -> Result<String, InvalidIdentifier> {
    let invalid = || InvalidIdentifier {
        input: input.to_string(),
    };

    // The handle segment may also be the `i/web` prefix used by share links
    let re = regex::Regex::new(
        r"(?i)https?://(?:www\.)?(?:twitter|x)\.com/(?:[^/\s]+/)?(?:web/)?status/([0-9]+)",
    )
    .map_err(|_| invalid())?;

    if let Some(id) = re.captures(input).and_then(|caps| caps.get(1)) {
        return Ok(id.as_str().to_string());
    }

    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        return Ok(input.to_string());
    }

    Err(invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_digits_are_returned_unchanged() {
        for id in ["20", "1234567890123456789", "0"] {
            assert_eq!(normalize(id).unwrap(), id);
        }
    }

    #[test]
    fn urls_on_both_hosts_yield_the_id() {
        let urls = [
            "https://x.com/jack/status/20",
            "https://twitter.com/jack/status/20",
            "http://www.twitter.com/jack/status/20",
            "https://www.x.com/jack/status/20?s=46&t=abc",
            "HTTPS://X.COM/Jack/STATUS/20",
            "https://twitter.com/i/web/status/20",
        ];
        for url in urls {
            assert_eq!(normalize(url).unwrap(), "20", "url: {}", url);
        }
    }

    #[test]
    fn malformed_input_is_rejected() {
        for input in [
            "",
            "jack",
            "20a",
            " 20",
            "https://example.com/jack/status/20",
            "https://x.com/jack",
            "https://x.com/jack/status/",
            "https://x.com/jack/status/\u{0662}\u{0660}",
            "\u{0662}\u{0660}",
        ] {
            let err = normalize(input).unwrap_err();
            assert_eq!(err.input, input);
        }
    }
}
