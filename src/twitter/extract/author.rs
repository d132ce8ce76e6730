//! Author handle resolution for HTML pages that do not name the author directly.

use scraper::{Html, Selector};
use url::Url;

use crate::twitter::record::UNKNOWN_AUTHOR;
use crate::twitter::text::is_handle;

/// Path segments that sit where a handle would but are navigation.
const NAV_SEGMENTS: &[&str] = &["i", "twitter", "web"];

const AUTHOR_META_SELECTORS: &[&str] = &[
    r#"meta[name="twitter:site"]"#,
    r#"meta[name="twitter:creator"]"#,
    r#"meta[property="twitter:site"]"#,
    r#"meta[property="twitter:creator"]"#,
    r#"meta[name="author"]"#,
];

/// Resolves the author from the source URL, then social meta tags, then the page
/// title. Falls back to `"unknown"`.
pub(super) fn resolve_author(doc: &Html, source_url: &str) -> String {
    author_from_url(source_url)
        .or_else(|| author_from_meta(doc))
        .or_else(|| author_from_title(doc))
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

/// The first path segment of `url`, when it looks like a handle.
pub(super) fn author_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next()?;
    if NAV_SEGMENTS.contains(&segment) || !is_handle(segment) {
        return None;
    }
    Some(segment.to_string())
}

fn author_from_meta(doc: &Html) -> Option<String> {
    for raw in AUTHOR_META_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        let Some(content) = doc
            .select(&selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(str::trim)
        else {
            continue;
        };

        if let Some(handle) = content.strip_prefix('@') {
            if !handle.is_empty() {
                return Some(handle.to_string());
            }
        } else if !content.is_empty() {
            let lower = content.to_lowercase();
            if !lower.contains("twitter") && !lower.contains("x.com") {
                return Some(content.to_string());
            }
        }
    }
    None
}

/// `"(@handle) on X"` / `"Name on Twitter: …"` title shapes.
pub(super) fn author_from_title(doc: &Html) -> Option<String> {
    let title = super::html::title_text(doc)?;
    if !title.contains(" on X") && !title.contains(" on Twitter") {
        return None;
    }

    let name = title.split(" on ").next()?.trim();
    let name = name
        .strip_prefix('(')
        .and_then(|n| n.strip_suffix(')'))
        .unwrap_or(name);
    if let Some(handle) = name.strip_prefix('@') {
        return Some(handle.to_string()).filter(|h| !h.is_empty());
    }

    let lower = name.to_lowercase();
    if name.is_empty() || ["post", "tweet", "x", "twitter"].contains(&lower.as_str()) || lower.contains("twitter") {
        return None;
    }
    Some(name.to_string())
}
