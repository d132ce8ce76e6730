//! Candidate source list for a tweet id.
//!
//! Candidates are ranked by how likely they are to carry server-rendered,
//! parseable tweet data: mirror front-ends first, then the public embed, legacy
//! and syndication endpoints, and finally the client-rendered web app.

use serde::Serialize;

use crate::config::{ScraperConfig, CANONICAL_HOST, LEGACY_HOST};

/// The family a candidate URL belongs to. Decides which extractor handles its HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Alternative front-end serving plain server-rendered HTML
    Mirror,
    /// Public oEmbed endpoint
    Embed,
    /// Legacy v1.1 status lookup
    LegacyApi,
    /// Syndication timeline endpoint
    Syndication,
    /// The X/Twitter web app itself
    WebApp,
}

/// One URL the pipeline may fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub url: String,
    pub kind: SourceKind,
}

impl Candidate {
    fn new(kind: SourceKind, url: String) -> Self {
        Self { url, kind }
    }
}

/// Builds the ordered candidate list from the injected mirror hosts and handles.
#[derive(Debug, Clone)]
pub struct SourceListBuilder {
    mirror_hosts: Vec<String>,
    guess_handles: Vec<String>,
}

impl SourceListBuilder {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            mirror_hosts: config.mirror_hosts.clone(),
            guess_handles: config.guess_handles.clone(),
        }
    }

    /// Full candidate list, username guesses included.
    pub fn build(&self, tweet_id: &str) -> Vec<Candidate> {
        let mut candidates = self.build_without_guesses(tweet_id);
        candidates.extend(self.username_guesses(tweet_id));
        candidates
    }

    /// Candidate list without the guessed `/<handle>/status/<id>` URLs.
    pub fn build_without_guesses(&self, tweet_id: &str) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .mirror_hosts
            .iter()
            .map(|host| {
                Candidate::new(
                    SourceKind::Mirror,
                    format!("https://{}/i/status/{}", host, tweet_id),
                )
            })
            .collect();

        let status_url = format!("https://{}/i/web/status/{}", LEGACY_HOST, tweet_id);
        candidates.push(Candidate::new(
            SourceKind::Embed,
            format!(
                "https://publish.{}/oembed?url={}",
                LEGACY_HOST,
                urlencoding::encode(&status_url)
            ),
        ));
        candidates.push(Candidate::new(
            SourceKind::LegacyApi,
            format!("https://api.{}/1.1/statuses/show/{}.json", LEGACY_HOST, tweet_id),
        ));
        candidates.push(Candidate::new(
            SourceKind::Syndication,
            format!(
                "https://syndication.{}/srv/timeline-profile/screen-name/twitter?include_entities=true&include_available_features=1&tweet_id={}",
                LEGACY_HOST, tweet_id
            ),
        ));

        for url in [
            format!("https://{}/i/web/status/{}", CANONICAL_HOST, tweet_id),
            format!("https://{}/i/web/status/{}", LEGACY_HOST, tweet_id),
            format!("https://{}/twitter/status/{}", CANONICAL_HOST, tweet_id),
        ] {
            candidates.push(Candidate::new(SourceKind::WebApp, url));
        }

        candidates
    }

    fn username_guesses(&self, tweet_id: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for handle in &self.guess_handles {
            if let Some(mirror) = self.mirror_hosts.first() {
                candidates.push(Candidate::new(
                    SourceKind::Mirror,
                    format!("https://{}/{}/status/{}", mirror, handle, tweet_id),
                ));
            }
            candidates.push(Candidate::new(
                SourceKind::WebApp,
                format!("https://{}/{}/status/{}", CANONICAL_HOST, handle, tweet_id),
            ));
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(candidates: &[Candidate]) -> Vec<SourceKind> {
        candidates.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn candidates_follow_reliability_ranking() {
        let builder = SourceListBuilder::new(&ScraperConfig::default());
        let candidates = builder.build("20");

        assert_eq!(candidates[0].url, "https://nitter.net/i/status/20");
        assert_eq!(
            &kinds(&candidates)[..9],
            &[
                SourceKind::Mirror,
                SourceKind::Mirror,
                SourceKind::Mirror,
                SourceKind::Embed,
                SourceKind::LegacyApi,
                SourceKind::Syndication,
                SourceKind::WebApp,
                SourceKind::WebApp,
                SourceKind::WebApp,
            ]
        );
        assert_eq!(
            candidates[3].url,
            "https://publish.twitter.com/oembed?url=https%3A%2F%2Ftwitter.com%2Fi%2Fweb%2Fstatus%2F20"
        );
        assert!(candidates[5].url.ends_with("tweet_id=20"));
        // five handles, each on the primary mirror and on x.com
        assert_eq!(candidates.len(), 9 + 10);
        assert_eq!(candidates[9].url, "https://nitter.net/twitter/status/20");
        assert_eq!(candidates[10].url, "https://x.com/twitter/status/20");
        assert!(candidates.iter().all(|c| c.url.contains("20")));
    }

    #[test]
    fn injected_hosts_replace_the_defaults() {
        let config = ScraperConfig {
            mirror_hosts: vec!["mirror.example".to_string()],
            guess_handles: vec!["jack".to_string()],
            ..ScraperConfig::default()
        };
        let builder = SourceListBuilder::new(&config);

        let full = builder.build("7");
        assert_eq!(full[0].url, "https://mirror.example/i/status/7");
        assert_eq!(full.len(), 1 + 3 + 3 + 2);
        assert_eq!(full[7].url, "https://mirror.example/jack/status/7");
        assert_eq!(full[7].kind, SourceKind::Mirror);

        assert_eq!(builder.build_without_guesses("7").len(), 7);
    }
}
