//! Tweet lookup without the authenticated Twitter/X API.
//!
//! This module contains the identifier normalizer, the candidate source list,
//! the page fetcher, the extraction cascade and the pipeline tying them together.

mod diagnostics;
mod extract;
mod fetcher;
mod identifier;
mod pipeline;
mod record;
mod sources;
mod text;

#[cfg(test)]
pub(crate) mod testing;

// Re-export public API
pub use diagnostics::{probe_candidates, run_diagnostics, CandidateReport, DebugReport};
pub use extract::{extract, is_json_content_type, ExtractContext};
pub use fetcher::{FetchError, FetchedPage, HttpFetcher, PageFetcher, Triage};
pub use identifier::{normalize, InvalidIdentifier};
pub use pipeline::{Attempt, AttemptOutcome, PipelineTrace, TweetPipeline};
pub use record::{TweetRecord, CONTENT_UNAVAILABLE, UNKNOWN_AUTHOR};
pub use sources::{Candidate, SourceKind, SourceListBuilder};

// Crate-internal re-exports (used by handlers and tests)
pub(crate) use text::{sanitize_for_logging, truncate_chars};
