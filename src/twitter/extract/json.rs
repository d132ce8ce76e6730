//! Extraction strategies for JSON responses.
//!
//! Three payload shapes are recognized: a v1.1 status object, an oEmbed object
//! and a syndication timeline.

use scraper::{Html, Selector};
use serde_json::{Map, Value};

use super::walk::find_object;
use super::ExtractContext;
use crate::twitter::record::{TweetRecord, UNKNOWN_AUTHOR};
use crate::twitter::text::collapse_whitespace;

pub(super) type JsonStrategy = fn(&Value, &ExtractContext) -> Option<TweetRecord>;

/// JSON strategies in priority order.
pub(super) const JSON_STRATEGIES: &[(&str, JsonStrategy)] = &[
    ("status_object", from_status_object),
    ("oembed", from_oembed),
    ("timeline", from_timeline),
];

/// Non-empty string field of a JSON object.
pub(super) fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// `full_text`, falling back to `text`.
pub(super) fn tweet_text(value: &Value) -> Option<&str> {
    str_field(value, "full_text").or_else(|| str_field(value, "text"))
}

fn id_matches(value: Option<&Value>, tweet_id: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == tweet_id,
        Some(Value::Number(n)) => n.to_string() == tweet_id,
        _ => false,
    }
}

/// v1.1 status lookup payload: `{id_str, full_text|text, user: {screen_name}, created_at}`.
fn from_status_object(value: &Value, ctx: &ExtractContext) -> Option<TweetRecord> {
    let obj = value.as_object()?;
    if !obj.contains_key("id_str") && !obj.contains_key("id") {
        return None;
    }
    let text = tweet_text(value)?;
    let author = value
        .pointer("/user/screen_name")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_AUTHOR);
    let created_at = str_field(value, "created_at").unwrap_or_default();
    Some(TweetRecord::found(&ctx.tweet_id, author, text, created_at))
}

/// oEmbed payload: the tweet is inside the `html` blockquote.
fn from_oembed(value: &Value, ctx: &ExtractContext) -> Option<TweetRecord> {
    let html = value.get("html")?.as_str()?;
    let author_name = value.get("author_name")?.as_str().unwrap_or_default();

    let text = embed_text(html)?;
    let author = embed_author(author_name, value.get("author_url").and_then(Value::as_str));
    Some(TweetRecord::found(&ctx.tweet_id, author, text, ""))
}

/// Plain text of an embed fragment without links or the "— Name (@handle) date" line.
fn embed_text(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);

    // The body paragraph, when the blockquote has one, already excludes the attribution
    let paragraphs = Selector::parse("blockquote p").ok()?;
    let mut text = fragment
        .select(&paragraphs)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");
    if text.trim().is_empty() {
        text = fragment.root_element().text().collect::<String>();
    }

    let urls = regex::Regex::new(r"https?://\S+").ok()?;
    let attribution = regex::Regex::new(r"(?s)(?:—|&mdash;)[^—]*\(@\w+\).*$").ok()?;
    let text = urls.replace_all(&text, "");
    let text = attribution.replace(&text, "");
    let text = collapse_whitespace(&text);

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn embed_author(author_name: &str, author_url: Option<&str>) -> String {
    if let Some((_, rest)) = author_name.split_once('@') {
        let handle = rest.split(')').next().unwrap_or_default().trim();
        if !handle.is_empty() {
            return handle.to_string();
        }
    }
    if let Some(handle) = author_url
        .and_then(|u| u.trim_end_matches('/').rsplit('/').next())
        .filter(|h| !h.is_empty() && !h.contains(':'))
    {
        return handle.to_string();
    }
    author_name.to_string()
}

/// Syndication timeline: `timeline.instructions[].addEntries.entries[].content.item.content.tweet`.
fn from_timeline(value: &Value, ctx: &ExtractContext) -> Option<TweetRecord> {
    let instructions = value.get("timeline")?.get("instructions")?;

    find_object(instructions, &mut |map: &Map<String, Value>| {
        let tweet = map.get("tweet")?;
        let id = tweet
            .get("id")
            .or_else(|| tweet.get("rest_id"))
            .or_else(|| tweet.get("id_str"));
        if !id_matches(id, &ctx.tweet_id) {
            return None;
        }
        let legacy = tweet.get("legacy")?;
        let text = tweet_text(legacy)?;
        let author = tweet
            .pointer("/core/user_results/result/legacy/screen_name")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_AUTHOR);
        let created_at = str_field(legacy, "created_at").unwrap_or_default();
        Some(TweetRecord::found(&ctx.tweet_id, author, text, created_at))
    })
}
