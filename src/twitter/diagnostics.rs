//! Per-candidate fetch diagnostics.
//!
//! The main pipeline folds every scraping failure into "not found". This module
//! probes the candidate list independently and reports what each source actually
//! returned, for investigating low-yield periods.

use log::info;
use scraper::Html;
use serde::Serialize;
use serde_json::Value;

use super::extract::{element_text, meta_content, select_first, title_text};
use super::fetcher::PageFetcher;
use super::pipeline::{Attempt, TweetPipeline};
use super::record::TweetRecord;
use super::sources::Candidate;
use super::text::truncate_chars;

/// Selectors probed for visible tweet text.
const PROBE_SELECTORS: &[&str] = &[
    r#"[data-testid="tweetText"]"#,
    r#"[data-testid="tweet-text"]"#,
    ".tweet-content",
    ".tweet-text",
    ".TweetTextSize",
];

/// What one candidate returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateReport {
    pub url: String,
    pub status_code: Option<u16>,
    pub title: Option<String>,
    pub og_description: Option<String>,
    pub twitter_description: Option<String>,
    pub has_tweet_content: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweet_selector_found: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweet_text_preview: Option<String>,
    pub tweet_id_found_in_content: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_json: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_tweet_text_in_json: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_oembed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_parse_error: Option<bool>,
    pub error: Option<String>,
}

/// Full diagnostic run for one tweet id.
#[derive(Debug, Clone, Serialize)]
pub struct DebugReport {
    pub tweet_id: String,
    pub urls_tried: Vec<CandidateReport>,
    pub attempts: Vec<Attempt>,
    pub final_result: TweetRecord,
    pub timestamp: String,
}

/// Probes each candidate once, in order, without stopping early.
pub async fn probe_candidates(
    fetcher: &dyn PageFetcher,
    candidates: &[Candidate],
    tweet_id: &str,
) -> Vec<CandidateReport> {
    let mut reports = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let mut report = CandidateReport {
            url: candidate.url.clone(),
            ..CandidateReport::default()
        };

        match fetcher.fetch(&candidate.url).await {
            Ok(page) => {
                report.status_code = Some(page.status);
                if page.status == 200 {
                    if page.is_json() {
                        inspect_json(&mut report, &page.body);
                    } else {
                        inspect_html(&mut report, &page.body, tweet_id);
                    }
                }
            }
            Err(e) => report.error = Some(e.to_string()),
        }
        reports.push(report);
    }
    reports
}

fn inspect_json(report: &mut CandidateReport, body: &str) {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => {
            report.is_json = Some(true);
            let object = value.as_object();
            report.json_keys = Some(
                object
                    .map(|map| map.keys().cloned().collect())
                    .unwrap_or_default(),
            );
            if let Some(map) = object {
                if map.contains_key("text") || map.contains_key("full_text") {
                    report.has_tweet_text_in_json = Some(true);
                }
                if map.contains_key("html") && map.contains_key("author_name") {
                    report.is_oembed = Some(true);
                }
            }
        }
        Err(_) => report.json_parse_error = Some(true),
    }
}

fn inspect_html(report: &mut CandidateReport, body: &str, tweet_id: &str) {
    let doc = Html::parse_document(body);
    report.title = title_text(&doc);
    report.og_description = meta_content(&doc, r#"meta[property="og:description"]"#);
    report.twitter_description = meta_content(&doc, r#"meta[name="twitter:description"]"#);

    for selector in PROBE_SELECTORS {
        if let Some(element) = select_first(&doc, selector) {
            report.has_tweet_content = true;
            report.tweet_selector_found = Some(selector.to_string());
            report.tweet_text_preview = Some(truncate_chars(&element_text(element), 100).to_string());
            break;
        }
    }

    report.tweet_id_found_in_content = body.contains(tweet_id);
}

/// Probes the candidate list (without username guesses) with the diagnostic
/// fetcher, then runs the real pipeline.
pub async fn run_diagnostics(
    pipeline: &TweetPipeline,
    fetcher: &dyn PageFetcher,
    tweet_id: &str,
) -> DebugReport {
    info!("Running scraping diagnostics for tweet {}", tweet_id);
    let candidates = pipeline.sources().build_without_guesses(tweet_id);
    let urls_tried = probe_candidates(fetcher, &candidates, tweet_id).await;
    let trace = pipeline.fetch_tweet_traced(tweet_id).await;

    DebugReport {
        tweet_id: tweet_id.to_string(),
        urls_tried,
        attempts: trace.attempts,
        final_result: trace.record,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitter::sources::SourceKind;
    use crate::twitter::testing::ScriptedFetcher;

    fn candidates(urls: &[&str]) -> Vec<Candidate> {
        urls.iter()
            .map(|url| Candidate {
                url: url.to_string(),
                kind: SourceKind::WebApp,
            })
            .collect()
    }

    #[tokio::test]
    async fn reports_html_json_and_failures() {
        let fetcher = ScriptedFetcher::new()
            .html(
                "https://html.example/",
                r#"<html><head><title>jack on X</title><meta property="og:description" content="just setting up my twttr"></head>
                <body><div data-testid="tweetText">just setting up my twttr</div><a href="/jack/status/20"></a></body></html>"#,
            )
            .page(
                "https://json.example/",
                200,
                "application/json",
                r#"{"html": "<blockquote></blockquote>", "author_name": "jack"}"#,
            )
            .page("https://broken.example/", 200, "application/json", "{not json")
            .unreachable("https://down.example/");

        let reports = probe_candidates(
            &fetcher,
            &candidates(&[
                "https://html.example/",
                "https://json.example/",
                "https://broken.example/",
                "https://down.example/",
                "https://missing.example/",
            ]),
            "20",
        )
        .await;

        assert_eq!(reports.len(), 5);

        let html = &reports[0];
        assert_eq!(html.status_code, Some(200));
        assert_eq!(html.title.as_deref(), Some("jack on X"));
        assert_eq!(html.og_description.as_deref(), Some("just setting up my twttr"));
        assert!(html.has_tweet_content);
        assert_eq!(html.tweet_selector_found.as_deref(), Some(r#"[data-testid="tweetText"]"#));
        assert!(html.tweet_id_found_in_content);

        let json = &reports[1];
        assert_eq!(json.is_json, Some(true));
        assert_eq!(json.is_oembed, Some(true));
        assert_eq!(json.json_keys.as_ref().map(Vec::len), Some(2));

        assert_eq!(reports[2].json_parse_error, Some(true));
        assert!(reports[3].error.is_some());
        assert_eq!(reports[3].status_code, None);
        assert_eq!(reports[4].status_code, Some(404));
        assert!(!reports[4].has_tweet_content);
    }
}
