//! Extraction strategies for generic HTML pages.
//!
//! Strategies run from the most structured signal (JSON-LD) to the weakest
//! (the page merely looks like a tweet page).

use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

use super::author::{author_from_url, resolve_author};
use super::json::str_field;
use super::walk::find_object;
use super::ExtractContext;
use crate::config::{CANONICAL_HOST, LEGACY_HOST};
use crate::twitter::record::{TweetRecord, UNKNOWN_AUTHOR};
use crate::twitter::text::collapse_whitespace;

/// A parsed page together with its raw markup.
pub(crate) struct HtmlPage<'a> {
    pub doc: Html,
    pub raw: &'a str,
}

impl<'a> HtmlPage<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            doc: Html::parse_document(raw),
            raw,
        }
    }
}

pub(super) type HtmlStrategy = fn(&HtmlPage<'_>, &ExtractContext) -> Option<TweetRecord>;

/// HTML strategies for non-mirror sources, in priority order.
pub(super) const HTML_STRATEGIES: &[(&str, HtmlStrategy)] = &[
    ("json_ld", from_json_ld),
    ("script_json", from_script_json),
    ("og_description", from_og_description),
    ("twitter_description", from_twitter_description),
    ("title", from_title),
    ("text_selectors", from_text_selectors),
    ("page_text", from_page_text),
    ("raw_pattern", from_raw_pattern),
    ("existence_signal", from_existence_signal),
];

/// Selectors historically used for tweet body text.
pub(crate) const TWEET_TEXT_SELECTORS: &[&str] = &[
    ".tweet-content",
    ".quote-text",
    ".tweet-text",
    ".timeline-tweet .tweet-content",
    ".main-tweet .tweet-content",
    r#"[data-testid="tweetText"]"#,
    r#"[data-testid="tweet-text"]"#,
    ".TweetTextSize",
    ".tweet-body",
    "p[lang]",
    "article p",
    ".status-content",
    ".tweet-body p",
];

const PAGE_TEXT_SKIP: &[&str] = &[
    "cookie", "privacy", "terms", "sign in", "log in", "follow", "retweet", "like", "share",
    "reply", "quote", "bookmark",
];

const RAW_PATTERN_SKIP: &[&str] = &["cookie", "privacy", "terms", "sign", "follow", "http", "www"];

const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// First element matching `selector`.
pub(crate) fn select_first<'a>(doc: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector).next()
}

/// Whitespace-collapsed text content of an element.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Non-empty `content` attribute of the first element matching `selector`.
pub(crate) fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    select_first(doc, selector)?
        .value()
        .attr("content")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
}

/// Trimmed `<title>` text.
pub(crate) fn title_text(doc: &Html) -> Option<String> {
    let title = select_first(doc, "title")?;
    let text = title.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Text of the page outside script, style and template elements.
pub(crate) fn visible_text(doc: &Html) -> String {
    let mut text = String::new();
    for node in doc.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .map_or(false, |el| HIDDEN_ELEMENTS.contains(&el.name()));
        if !hidden {
            text.push_str(fragment);
        }
    }
    text
}

fn has_skip_word(text: &str, skip: &[&str]) -> bool {
    let lower = text.to_lowercase();
    skip.iter().any(|word| lower.contains(word))
}

/// `application/ld+json` blocks carrying a `text` field.
fn from_json_ld(page: &HtmlPage<'_>, ctx: &ExtractContext) -> Option<TweetRecord> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;
    page.doc.select(&selector).find_map(|script| {
        let value: Value = serde_json::from_str(&script.text().collect::<String>()).ok()?;
        let text = str_field(&value, "text")?;
        let author = value
            .pointer("/author/url")
            .and_then(Value::as_str)
            .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
            .filter(|handle| !handle.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR);
        let created_at = str_field(&value, "datePublished").unwrap_or_default();
        Some(TweetRecord::found(&ctx.tweet_id, author, text, created_at))
    })
}

/// Inline scripts holding JSON that mentions the tweet id.
fn from_script_json(page: &HtmlPage<'_>, ctx: &ExtractContext) -> Option<TweetRecord> {
    let selector = Selector::parse("script").ok()?;
    page.doc.select(&selector).find_map(|script| {
        let body = script.text().collect::<String>();
        if !body.contains(&ctx.tweet_id) {
            return None;
        }
        let lower = body.to_lowercase();
        if !lower.contains("tweet") && !lower.contains("text") {
            return None;
        }
        let trimmed = body.trim();
        if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
            return None;
        }

        let value: Value = serde_json::from_str(trimmed).ok()?;
        find_object(&value, &mut |map: &Map<String, Value>| {
            let field = |key: &str| {
                map.get(key)
                    .and_then(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
            };
            let text = field("full_text").or_else(|| field("text"))?;
            if text.chars().count() <= 10 {
                return None;
            }
            let author = map
                .get("user")
                .and_then(|user| user.get("screen_name"))
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_AUTHOR);
            let created_at = field("created_at").unwrap_or_default();
            Some(TweetRecord::found(&ctx.tweet_id, author, text, created_at))
        })
    })
}

/// Open Graph description, with the author taken from `og:url` when present.
fn from_og_description(page: &HtmlPage<'_>, ctx: &ExtractContext) -> Option<TweetRecord> {
    let text = meta_content(&page.doc, r#"meta[property="og:description"]"#)?;
    let author = meta_content(&page.doc, r#"meta[property="og:url"]"#)
        .and_then(|url| author_from_url(&url))
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
    Some(TweetRecord::found(&ctx.tweet_id, author, text, ""))
}

fn from_twitter_description(page: &HtmlPage<'_>, ctx: &ExtractContext) -> Option<TweetRecord> {
    let text = meta_content(&page.doc, r#"meta[name="twitter:description"]"#)
        .or_else(|| meta_content(&page.doc, r#"meta[property="twitter:description"]"#))?;
    Some(TweetRecord::found(&ctx.tweet_id, UNKNOWN_AUTHOR, text, ""))
}

/// First quoted span in `text`, for straight, curly or single quotes.
fn quoted(text: &str) -> Option<&str> {
    for (open, close) in [('"', '"'), ('“', '”'), ('\'', '\'')] {
        if let Some(start) = text.find(open) {
            let rest = &text[start + open.len_utf8()..];
            if let Some(end) = rest.find(close) {
                let inner = rest[..end].trim();
                if !inner.is_empty() {
                    return Some(inner);
                }
            }
        }
    }
    None
}

/// `Name on X: "text" / X` and `text / X` title shapes.
fn from_title(page: &HtmlPage<'_>, ctx: &ExtractContext) -> Option<TweetRecord> {
    let title = title_text(&page.doc)?;

    if title.contains(" on X:") || title.contains(" on Twitter:") {
        if let Some((name, rest)) = title.split_once(" on ") {
            if let Some(text) = quoted(rest) {
                let name = name.trim();
                let author = name.strip_prefix('@').unwrap_or(name);
                return Some(TweetRecord::found(&ctx.tweet_id, author, text, ""));
            }
        }
    }

    if title.contains(" / X") {
        let text = title.replace(" / X", "");
        let text = text.trim();
        if !text.is_empty() {
            return Some(TweetRecord::found(&ctx.tweet_id, UNKNOWN_AUTHOR, text, ""));
        }
    }

    None
}

fn from_text_selectors(page: &HtmlPage<'_>, ctx: &ExtractContext) -> Option<TweetRecord> {
    TWEET_TEXT_SELECTORS.iter().find_map(|selector| {
        let text = element_text(select_first(&page.doc, selector)?);
        if text.chars().count() > 5 {
            Some(TweetRecord::found(&ctx.tweet_id, UNKNOWN_AUTHOR, text, ""))
        } else {
            None
        }
    })
}

/// A tweet-length line of visible text, when the page mentions the id.
fn from_page_text(page: &HtmlPage<'_>, ctx: &ExtractContext) -> Option<TweetRecord> {
    let text = visible_text(&page.doc);
    if !text.contains(&ctx.tweet_id) {
        return None;
    }
    text.lines()
        .map(str::trim)
        .find(|line| {
            let len = line.chars().count();
            (20..500).contains(&len) && !has_skip_word(line, PAGE_TEXT_SKIP)
        })
        .map(|line| TweetRecord::found(&ctx.tweet_id, UNKNOWN_AUTHOR, line, ""))
}

/// Quoted or tag-delimited substrings of the raw markup, when it mentions the id.
fn from_raw_pattern(page: &HtmlPage<'_>, ctx: &ExtractContext) -> Option<TweetRecord> {
    if !page.raw.contains(&ctx.tweet_id) {
        return None;
    }
    for pattern in [r#""([^"]{20,280})""#, r"'([^']{20,280})'", r">([^<]{20,280})<"] {
        let re = regex::Regex::new(pattern).ok()?;
        for caps in re.captures_iter(page.raw) {
            let Some(found) = caps.get(1) else {
                continue;
            };
            let candidate = found.as_str().trim();
            if has_skip_word(candidate, RAW_PATTERN_SKIP) || candidate.chars().count() <= 15 {
                continue;
            }
            return Some(TweetRecord::found(&ctx.tweet_id, UNKNOWN_AUTHOR, candidate, ""));
        }
    }
    None
}

/// The page looks like a tweet page but no body was found.
fn from_existence_signal(page: &HtmlPage<'_>, ctx: &ExtractContext) -> Option<TweetRecord> {
    let article = select_first(&page.doc, r#"meta[property="og:type"][content="article"]"#).is_some();
    let card = select_first(&page.doc, r#"meta[name="twitter:card"]"#).is_some();
    let host = page.raw.contains(LEGACY_HOST) || page.raw.contains(CANONICAL_HOST);
    if article || card || host {
        Some(TweetRecord::content_unavailable(&ctx.tweet_id))
    } else {
        None
    }
}

/// Runs the generic HTML strategies in order and fills in the author when the
/// accepting strategy could not.
pub(super) fn extract_generic(page: &HtmlPage<'_>, ctx: &ExtractContext) -> Option<(&'static str, TweetRecord)> {
    let (name, mut record) = HTML_STRATEGIES.iter().find_map(|(name, strategy)| {
        strategy(page, ctx)
            .filter(TweetRecord::is_accepted)
            .map(|record| (*name, record))
    })?;

    if record.author_username == UNKNOWN_AUTHOR && !record.is_content_unavailable() {
        record.author_username = resolve_author(&page.doc, &ctx.source_url);
    }
    Some((name, record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitter::record::CONTENT_UNAVAILABLE;
    use crate::twitter::sources::SourceKind;

    fn ctx(url: &str) -> ExtractContext {
        ExtractContext::new("20", url, SourceKind::WebApp)
    }

    fn run(html: &str, url: &str) -> Option<(&'static str, TweetRecord)> {
        extract_generic(&HtmlPage::parse(html), &ctx(url))
    }

    #[test]
    fn json_ld_comes_first() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"text": "just setting up my twttr", "author": {"url": "https://x.com/jack"}, "datePublished": "2006-03-21"}</script>
            <meta property="og:description" content="something else">
        </head></html>"#;
        let (name, record) = run(html, "https://x.com/i/web/status/20").unwrap();
        assert_eq!(name, "json_ld");
        assert_eq!(record.author_username, "jack");
        assert_eq!(record.created_at, "2006-03-21");
    }

    #[test]
    fn script_json_is_searched_recursively() {
        let html = r#"<html><body><script>{"data": {"tweets": [{"id_str": "20", "full_text": "just setting up my twttr", "user": {"screen_name": "jack"}}]}}</script></body></html>"#;
        let (name, record) = run(html, "https://x.com/i/web/status/20").unwrap();
        assert_eq!(name, "script_json");
        assert_eq!(record.tweet_text, "just setting up my twttr");
        assert_eq!(record.author_username, "jack");
    }

    #[test]
    fn og_description_uses_og_url_author() {
        let html = r#"<html><head>
            <meta property="og:description" content="just setting up my twttr">
            <meta property="og:url" content="https://x.com/jack/status/20">
        </head></html>"#;
        let (name, record) = run(html, "https://x.com/i/web/status/20").unwrap();
        assert_eq!(name, "og_description");
        assert_eq!(record.author_username, "jack");
    }

    #[test]
    fn twitter_description_falls_back_to_url_author() {
        let html = r#"<html><head><meta name="twitter:description" content="just setting up my twttr"></head></html>"#;
        let (name, record) = run(html, "https://x.com/jack/status/20").unwrap();
        assert_eq!(name, "twitter_description");
        assert_eq!(record.author_username, "jack");
    }

    #[test]
    fn title_shapes_are_recognized() {
        let html = r#"<html><head><title>jack on X: "just setting up my twttr" / X</title></head></html>"#;
        let (name, record) = run(html, "https://x.com/i/web/status/20").unwrap();
        assert_eq!(name, "title");
        assert_eq!(record.author_username, "jack");
        assert_eq!(record.tweet_text, "just setting up my twttr");

        let html = "<html><head><title>just setting up my twttr / X</title></head></html>";
        let (_, record) = run(html, "https://x.com/jack/status/20").unwrap();
        assert_eq!(record.tweet_text, "just setting up my twttr");
        assert_eq!(record.author_username, "jack");
    }

    #[test]
    fn short_selector_matches_are_skipped() {
        let html = r#"<html><body><div class="tweet-content">hi</div><div data-testid="tweetText">just setting up my twttr</div></body></html>"#;
        let (name, record) = run(html, "https://x.com/i/web/status/20").unwrap();
        assert_eq!(name, "text_selectors");
        assert_eq!(record.tweet_text, "just setting up my twttr");
    }

    #[test]
    fn page_text_skips_boilerplate_lines() {
        let html = "<html><body><div>\nSign in to see more of this conversation\njust setting up my twttr today\nstatus 20\n</div></body></html>";
        let (name, record) = run(html, "https://x.com/i/web/status/20").unwrap();
        assert_eq!(name, "page_text");
        assert_eq!(record.tweet_text, "just setting up my twttr today");
    }

    #[test]
    fn raw_pattern_needs_the_id_in_markup() {
        let html = r#"<html><body><span data-id="20" data-note="just setting up my twttr again"></span></body></html>"#;
        let (name, record) = run(html, "https://example.org/page").unwrap();
        assert_eq!(name, "raw_pattern");
        assert_eq!(record.tweet_text, "just setting up my twttr again");
    }

    #[test]
    fn existence_signal_accepts_placeholder() {
        let html = r#"<html><head><meta name="twitter:card" content="summary"></head><body></body></html>"#;
        let (name, record) = run(html, "https://x.com/jack/status/20").unwrap();
        assert_eq!(name, "existence_signal");
        assert!(record.exists);
        assert_eq!(record.tweet_text, CONTENT_UNAVAILABLE);
        assert_eq!(record.author_username, "unknown");
    }

    #[test]
    fn unrelated_page_is_rejected() {
        let html = "<html><head><title>Nothing here</title></head><body><p>hi</p></body></html>";
        assert!(run(html, "https://example.org/page").is_none());
    }

    #[test]
    fn visible_text_ignores_scripts() {
        let doc = Html::parse_document("<html><body><p>shown</p><script>var hidden = 1;</script></body></html>");
        assert_eq!(visible_text(&doc).trim(), "shown");
    }
}
