//! The extraction cascade.
//!
//! A fetched body is handed to a fixed priority list of strategies; the first
//! strategy producing an accepted [`TweetRecord`] wins. JSON bodies go through the
//! JSON strategies, everything else (including JSON that fails to parse) through
//! the mirror extractor or the generic HTML strategies.

mod author;
mod html;
mod json;
mod mirror;
mod walk;

use log::debug;
use serde_json::Value;

use crate::twitter::record::TweetRecord;
use crate::twitter::sources::SourceKind;
use crate::twitter::text::sanitize_for_logging;

use html::HtmlPage;

pub(crate) use html::{element_text, meta_content, select_first, title_text};

/// What the cascade knows about the body it is looking at.
#[derive(Debug, Clone)]
pub struct ExtractContext {
    /// Requested tweet id
    pub tweet_id: String,
    /// URL the body was fetched from
    pub source_url: String,
    /// Family of the source
    pub kind: SourceKind,
}

impl ExtractContext {
    pub fn new(tweet_id: &str, source_url: &str, kind: SourceKind) -> Self {
        Self {
            tweet_id: tweet_id.to_string(),
            source_url: source_url.to_string(),
            kind,
        }
    }
}

/// True when a declared content type announces JSON.
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("application/json")
}

/// Runs the cascade over one fetched body.
///
/// # Parameters
///
/// - `body`: The response body
/// - `content_type`: The declared `Content-Type` header, possibly empty
/// - `ctx`: Tweet id, source URL and source family
///
/// # Returns
///
/// - `Some(TweetRecord)`: The first accepted record, with `exists == true`
/// - `None`: No strategy produced an accepted record for this source
pub fn extract(body: &str, content_type: &str, ctx: &ExtractContext) -> Option<TweetRecord> {
    let accepted = if is_json_content_type(content_type) {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => extract_json(&value, ctx),
            Err(e) => {
                debug!("Body from {} is not valid JSON ({}), parsing as HTML", ctx.source_url, e);
                extract_html(body, ctx)
            }
        }
    } else {
        extract_html(body, ctx)
    };

    match accepted {
        Some((strategy, record)) => {
            debug!(
                "Strategy '{}' accepted tweet {} from {}: author={}, text='{}'",
                strategy,
                ctx.tweet_id,
                ctx.source_url,
                record.author_username,
                sanitize_for_logging(&record.tweet_text, 80)
            );
            Some(record)
        }
        None => {
            debug!("No strategy accepted tweet {} from {}", ctx.tweet_id, ctx.source_url);
            None
        }
    }
}

fn extract_json(value: &Value, ctx: &ExtractContext) -> Option<(&'static str, TweetRecord)> {
    json::JSON_STRATEGIES.iter().find_map(|(name, strategy)| {
        strategy(value, ctx)
            .filter(TweetRecord::is_accepted)
            .map(|record| (*name, record))
    })
}

fn extract_html(body: &str, ctx: &ExtractContext) -> Option<(&'static str, TweetRecord)> {
    let page = HtmlPage::parse(body);
    if ctx.kind == SourceKind::Mirror {
        mirror::extract_mirror(&page, ctx).filter(|(_, record)| record.is_accepted())
    } else {
        html::extract_generic(&page, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitter::record::CONTENT_UNAVAILABLE;

    #[test]
    fn mirror_scenario_yields_jack() {
        let ctx = ExtractContext::new("20", "https://nitter.net/i/status/20", SourceKind::Mirror);
        let body = r#"<html><body><div class="tweet-content">just setting up my twttr</div><a class="username">jack</a></body></html>"#;
        let record = extract(body, "text/html; charset=utf-8", &ctx).unwrap();
        assert!(record.exists);
        assert_eq!(record.author_username, "jack");
        assert_eq!(record.tweet_text, "just setting up my twttr");
        assert!(record.timestamp > 0);
    }

    #[test]
    fn json_that_matches_no_strategy_is_rejected() {
        let ctx = ExtractContext::new("20", "https://api.twitter.com/1.1/statuses/show/20.json", SourceKind::LegacyApi);
        let body = r#"{"errors": [{"code": 144, "message": "No status found with that ID. x.com 20"}]}"#;
        assert_eq!(extract(body, "application/json", &ctx), None);
    }

    #[test]
    fn invalid_json_falls_through_to_html() {
        let ctx = ExtractContext::new("20", "https://x.com/i/web/status/20", SourceKind::WebApp);
        let body = r#"<html><head><meta name="twitter:card" content="summary"></head></html>"#;
        let record = extract(body, "application/json", &ctx).unwrap();
        assert_eq!(record.tweet_text, CONTENT_UNAVAILABLE);
    }

    #[test]
    fn oembed_json_is_extracted() {
        let ctx = ExtractContext::new("20", "https://publish.twitter.com/oembed", SourceKind::Embed);
        let body = r#"{"author_name": "jack", "author_url": "https://twitter.com/jack", "html": "<blockquote><p>just setting up my twttr</p>&mdash; jack (@jack)</blockquote>"}"#;
        let record = extract(body, "application/json; charset=utf-8", &ctx).unwrap();
        assert_eq!(record.author_username, "jack");
        assert_eq!(record.tweet_text, "just setting up my twttr");
    }

    #[test]
    fn empty_body_is_rejected() {
        let ctx = ExtractContext::new("20", "https://example.org/", SourceKind::WebApp);
        assert_eq!(extract("", "", &ctx), None);
    }
}
