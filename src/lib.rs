//! # Tweetcheck Library
//!
//! A Rust web service library that verifies whether a tweet exists, and recovers its
//! author and text, without authenticated Twitter/X API access. Lookups walk an
//! ordered list of public sources (mirror front-ends, the oEmbed endpoint, the legacy
//! REST endpoint, the syndication endpoint and the web app) and run a cascade of
//! extraction strategies over whatever each source returns.
//!
//! ## Features
//!
//! - HTTP server with lookup, verification and diagnostic endpoints
//! - Sequential multi-source scraping with user-agent rotation and request jitter
//! - JSON and HTML extraction strategies tried in a fixed priority order
//! - Structured logging
//! - Health check endpoint
//!
//! ## Configuration
//!
//! All settings have defaults and can be overridden from the environment:
//! - `PORT`: Server port (defaults to 3000)
//! - `TWEETCHECK_MIRROR_HOSTS`: Comma-separated mirror host names
//! - `TWEETCHECK_USER_AGENTS`: `|`-separated user-agent strings
//! - `TWEETCHECK_TIMEOUT_SECS` / `TWEETCHECK_DEBUG_TIMEOUT_SECS`: Request timeouts
//! - `TWEETCHECK_JITTER_MIN_MS` / `TWEETCHECK_JITTER_MAX_MS`: Pre-request delay bounds
//!
//! ## API Endpoints
//!
//! - `GET /`: Service banner
//! - `GET /health`: Returns service health status
//! - `GET /api/v1/tweets/:tweet_id`: Looks up a tweet by id or URL
//! - `GET /api/v1/verify-tweet?url=...`: Verifies a tweet URL
//! - `GET /api/v1/status`: Scraping configuration summary
//! - `GET /api/v1/scraping/test`: Self-test against a well-known tweet
//! - `GET /api/v1/scraping/debug/:tweet_id`: Per-source diagnostics

pub mod config;
pub mod handlers;
pub mod twitter;

// Re-export commonly used types and functions
pub use config::{get_server_port, ScraperConfig};
pub use handlers::{
    create_router, handle_get_tweet, handle_health, handle_root, handle_scraping_debug,
    handle_scraping_test, handle_status, handle_verify_tweet, AppState,
};
pub use twitter::{normalize, PipelineTrace, TweetPipeline, TweetRecord};
