//! Extractor for mirror front-end pages.
//!
//! Mirror front-ends render the tweet server-side in a small, stable markup, so
//! they get a dedicated extractor instead of the generic heuristics.

use scraper::{ElementRef, Selector};

use super::html::{element_text, select_first, HtmlPage};
use super::ExtractContext;
use crate::twitter::record::{TweetRecord, UNKNOWN_AUTHOR};

/// Containers holding the requested tweet, in priority order.
const CONTAINER_SELECTORS: &[&str] = &[".main-tweet", ".timeline-tweet"];

/// Page-level body selectors tried when no container yields text.
const BODY_SELECTORS: &[&str] = &[".tweet-content", ".tweet-text", ".quote-text"];

const USERNAME_SELECTORS: &[&str] = &[".username", ".fullname"];

fn accepted_text(text: &str) -> bool {
    text.chars().count() > 5
}

fn clean_username(element: ElementRef<'_>) -> String {
    element_text(element).replace('@', "")
}

fn first_in<'a>(container: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        container.select(&selector).next()
    })
}

fn page_username(page: &HtmlPage<'_>) -> Option<String> {
    USERNAME_SELECTORS
        .iter()
        .find_map(|selector| select_first(&page.doc, selector))
        .map(clean_username)
        .filter(|name| !name.is_empty())
}

fn from_containers(page: &HtmlPage<'_>, ctx: &ExtractContext) -> Option<TweetRecord> {
    for raw in CONTAINER_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        for container in page.doc.select(&selector) {
            let Some(content) = first_in(container, &[".tweet-content"]) else {
                continue;
            };
            let text = element_text(content);
            if !accepted_text(&text) {
                continue;
            }

            let author = first_in(container, USERNAME_SELECTORS)
                .map(clean_username)
                .filter(|name| !name.is_empty())
                .or_else(|| page_username(page))
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
            let created_at = first_in(container, &[".tweet-date a"])
                .and_then(|link| link.value().attr("title"))
                .unwrap_or_default();
            return Some(TweetRecord::found(&ctx.tweet_id, author, text, created_at));
        }
    }
    None
}

fn from_page_body(page: &HtmlPage<'_>, ctx: &ExtractContext) -> Option<TweetRecord> {
    let text = BODY_SELECTORS
        .iter()
        .filter_map(|selector| select_first(&page.doc, selector))
        .map(element_text)
        .find(|text| accepted_text(text))?;
    let author = page_username(page).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
    let created_at = select_first(&page.doc, ".tweet-date a")
        .and_then(|link| link.value().attr("title"))
        .unwrap_or_default();
    Some(TweetRecord::found(&ctx.tweet_id, author, text, created_at))
}

/// Runs the mirror extractor: tweet containers, then page-level body text, then
/// the placeholder when the page mentions the tweet id.
pub(super) fn extract_mirror(page: &HtmlPage<'_>, ctx: &ExtractContext) -> Option<(&'static str, TweetRecord)> {
    if let Some(record) = from_containers(page, ctx) {
        return Some(("mirror_container", record));
    }
    if let Some(record) = from_page_body(page, ctx) {
        return Some(("mirror_body", record));
    }
    if page.raw.contains(&ctx.tweet_id) {
        return Some(("mirror_placeholder", TweetRecord::content_unavailable(&ctx.tweet_id)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitter::record::CONTENT_UNAVAILABLE;
    use crate::twitter::sources::SourceKind;

    fn run(html: &str) -> Option<(&'static str, TweetRecord)> {
        let ctx = ExtractContext::new("20", "https://nitter.net/i/status/20", SourceKind::Mirror);
        extract_mirror(&HtmlPage::parse(html), &ctx)
    }

    #[test]
    fn bare_tweet_content_and_username() {
        let html = r#"<html><body><div class="tweet-content">just setting up my twttr</div><a class="username">jack</a></body></html>"#;
        let (name, record) = run(html).unwrap();
        assert_eq!(name, "mirror_body");
        assert!(record.exists);
        assert_eq!(record.author_username, "jack");
        assert_eq!(record.tweet_text, "just setting up my twttr");
    }

    #[test]
    fn main_tweet_container_wins() {
        let html = r#"<html><body>
            <div class="timeline-tweet"><div class="tweet-content">a reply underneath</div><a class="username">@someone</a></div>
            <div class="main-tweet">
                <a class="fullname">Jack</a><a class="username">@jack</a>
                <span class="tweet-date"><a title="Mar 21, 2006 · 8:50 PM UTC">Mar 21, 2006</a></span>
                <div class="tweet-content media-body">just setting up my twttr</div>
            </div>
        </body></html>"#;
        let (name, record) = run(html).unwrap();
        assert_eq!(name, "mirror_container");
        assert_eq!(record.author_username, "jack");
        assert_eq!(record.tweet_text, "just setting up my twttr");
        assert_eq!(record.created_at, "Mar 21, 2006 · 8:50 PM UTC");
    }

    #[test]
    fn short_text_falls_back_to_placeholder() {
        let html = r#"<html><body><a href="/jack/status/20">link</a><div class="tweet-content">hey</div></body></html>"#;
        let (name, record) = run(html).unwrap();
        assert_eq!(name, "mirror_placeholder");
        assert_eq!(record.tweet_text, CONTENT_UNAVAILABLE);
        assert_eq!(record.author_username, "unknown");
    }

    #[test]
    fn unrelated_mirror_page_is_rejected() {
        let html = "<html><body><div class=\"error-panel\">Tweet not found</div></body></html>";
        assert!(run(html).is_none());
    }
}
