//! The fetch-and-extract pipeline.
//!
//! Candidates are tried strictly in order, one fetch each. The first candidate
//! whose body yields an accepted record ends the run; when every candidate is
//! exhausted the not-found sentinel is returned. Scraping failures never escape:
//! they are recorded in the run's [`PipelineTrace`] and logged.

use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;

use super::extract::{extract, ExtractContext};
use super::fetcher::{HttpFetcher, PageFetcher, Triage};
use super::record::TweetRecord;
use super::sources::{Candidate, SourceKind, SourceListBuilder};
use crate::config::ScraperConfig;

/// What happened to one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The body produced an accepted record
    Accepted,
    /// The body was fetched but no strategy accepted it
    Rejected,
    /// HTTP 404
    NotFound,
    /// HTTP 429
    Throttled,
    /// Any other HTTP status
    UnexpectedStatus { status: u16 },
    /// The request never completed
    TransportError { error: String },
}

/// One candidate and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub url: String,
    pub kind: SourceKind,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// The record returned by a run, plus what happened to each attempted candidate.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineTrace {
    pub record: TweetRecord,
    pub attempts: Vec<Attempt>,
}

/// Sequential multi-source tweet lookup.
///
/// The pipeline holds no mutable state and can be shared across concurrent
/// requests behind an `Arc`.
pub struct TweetPipeline {
    fetcher: Arc<dyn PageFetcher>,
    sources: SourceListBuilder,
}

impl TweetPipeline {
    pub fn new(fetcher: Arc<dyn PageFetcher>, sources: SourceListBuilder) -> Self {
        Self { fetcher, sources }
    }

    /// Pipeline over HTTP using the main-path timeout and jitter from `config`.
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(
            Arc::new(HttpFetcher::primary(config)),
            SourceListBuilder::new(config),
        )
    }

    pub fn sources(&self) -> &SourceListBuilder {
        &self.sources
    }

    pub fn fetcher(&self) -> &Arc<dyn PageFetcher> {
        &self.fetcher
    }

    /// Looks up a tweet by its normalized id.
    ///
    /// Always returns a record: the first accepted one in candidate order, or the
    /// not-found sentinel.
    pub async fn fetch_tweet(&self, tweet_id: &str) -> TweetRecord {
        self.fetch_tweet_traced(tweet_id).await.record
    }

    /// Like [`TweetPipeline::fetch_tweet`], keeping the per-candidate outcomes.
    pub async fn fetch_tweet_traced(&self, tweet_id: &str) -> PipelineTrace {
        let candidates = self.sources.build(tweet_id);
        self.run(tweet_id, &candidates).await
    }

    /// Runs the pipeline over an explicit candidate list.
    pub async fn run(&self, tweet_id: &str, candidates: &[Candidate]) -> PipelineTrace {
        info!("Looking up tweet {} across {} candidates", tweet_id, candidates.len());
        let mut attempts = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let outcome = match self.fetcher.fetch(&candidate.url).await {
                Ok(page) => match page.triage() {
                    Triage::Success => {
                        let ctx = ExtractContext::new(tweet_id, &candidate.url, candidate.kind);
                        match extract(&page.body, &page.content_type, &ctx) {
                            Some(record) => {
                                info!(
                                    "Tweet {} accepted from {} after {} attempts",
                                    tweet_id,
                                    candidate.url,
                                    attempts.len() + 1
                                );
                                attempts.push(Attempt {
                                    url: candidate.url.clone(),
                                    kind: candidate.kind,
                                    outcome: AttemptOutcome::Accepted,
                                });
                                return PipelineTrace { record, attempts };
                            }
                            None => AttemptOutcome::Rejected,
                        }
                    }
                    Triage::NotFound => AttemptOutcome::NotFound,
                    Triage::Throttled => AttemptOutcome::Throttled,
                    Triage::Unexpected(status) => AttemptOutcome::UnexpectedStatus { status },
                },
                Err(e) => AttemptOutcome::TransportError {
                    error: e.to_string(),
                },
            };

            debug!("Candidate {} for tweet {}: {:?}", candidate.url, tweet_id, outcome);
            attempts.push(Attempt {
                url: candidate.url.clone(),
                kind: candidate.kind,
                outcome,
            });
        }

        info!(
            "Tweet {} not found after {} candidates",
            tweet_id,
            attempts.len()
        );
        PipelineTrace {
            record: TweetRecord::not_found(tweet_id),
            attempts,
        }
    }
}
