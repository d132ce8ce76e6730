//! Single-attempt page fetching.
//!
//! Every candidate URL gets exactly one GET with a random browser user agent,
//! browser-like headers and a random delay beforehand. The HTTP client is built
//! per attempt and dropped when the attempt ends.

use async_trait::async_trait;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT};
use std::time::Duration;
use thiserror::Error;

use crate::config::ScraperConfig;
use crate::twitter::extract::is_json_content_type;

/// Transport-level failure of one fetch attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

/// A response as seen by the extraction cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status code after redirects
    pub status: u16,
    /// Declared `Content-Type`, empty when absent
    pub content_type: String,
    /// Response body; only read for 200 responses
    pub body: String,
}

/// How the pipeline treats a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triage {
    /// 200, hand the body to the extraction cascade
    Success,
    /// 404, the source has no record of the tweet
    NotFound,
    /// 429, the source throttled this request
    Throttled,
    /// Anything else, skipped like a missing record
    Unexpected(u16),
}

impl FetchedPage {
    pub fn triage(&self) -> Triage {
        match self.status {
            200 => Triage::Success,
            404 => Triage::NotFound,
            429 => Triage::Throttled,
            other => Triage::Unexpected(other),
        }
    }

    /// True when the declared content type is JSON.
    pub fn is_json(&self) -> bool {
        is_json_content_type(&self.content_type)
    }
}

/// Fetches one URL. Implemented over HTTP by [`HttpFetcher`] and by scripted
/// fetchers in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;

    /// A user agent this fetcher would send, for status reporting.
    fn sample_user_agent(&self) -> String {
        "unknown".to_string()
    }
}

/// The reqwest-backed fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    user_agents: Vec<String>,
    timeout: Duration,
    delay_min: Duration,
    delay_max: Duration,
}

impl HttpFetcher {
    /// Fetcher for the main pipeline: configured timeout and random jitter.
    pub fn primary(config: &ScraperConfig) -> Self {
        Self {
            user_agents: config.user_agents.clone(),
            timeout: config.request_timeout,
            delay_min: config.jitter_min,
            delay_max: config.jitter_max,
        }
    }

    /// Fetcher for the diagnostic endpoints: shorter timeout and a fixed delay.
    pub fn diagnostic(config: &ScraperConfig) -> Self {
        Self {
            user_agents: config.user_agents.clone(),
            timeout: config.diagnostic_timeout,
            delay_min: config.diagnostic_delay,
            delay_max: config.diagnostic_delay,
        }
    }

    fn pick_user_agent(&self) -> String {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }

    fn delay(&self) -> Duration {
        if self.delay_max <= self.delay_min {
            return self.delay_min;
        }
        let min = self.delay_min.as_millis() as u64;
        let max = self.delay_max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    fn scraping_headers(&self) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.pick_user_agent())?);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert("dnt", HeaderValue::from_static("1"));
        headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));
        headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
        headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        Ok(headers)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let delay = self.delay();
        tokio::time::sleep(delay).await;

        let client = reqwest::Client::builder()
            .default_headers(self.scraping_headers()?)
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(FetchError::Client)?;

        debug!("GET {} after {:?} delay", url, delay);
        let response = client.get(url).send().await.map_err(FetchError::Transport)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = if status == 200 {
            response.text().await.map_err(FetchError::Transport)?
        } else {
            String::new()
        };

        debug!("{} -> {} ({} bytes, '{}')", url, status, body.len(), content_type);
        Ok(FetchedPage {
            status,
            content_type,
            body,
        })
    }

    fn sample_user_agent(&self) -> String {
        self.pick_user_agent()
    }
}
