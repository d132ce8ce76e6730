//! HTTP route handlers for the tweetcheck service.
//!
//! This module contains the HTTP route handler functions that expose the tweet
//! lookup pipeline, the verification wrapper and the diagnostic endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use log::{info, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::{ScraperConfig, CANONICAL_HOST};
use crate::twitter::{
    normalize, run_diagnostics, sanitize_for_logging, truncate_chars, HttpFetcher, PageFetcher,
    TweetPipeline, TweetRecord,
};

/// Tweet used by the scraping self-test: the first tweet ever posted.
pub const SELF_TEST_TWEET_ID: &str = "20";

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

type ApiError = (StatusCode, Json<Value>);

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Main lookup pipeline
    pub pipeline: Arc<TweetPipeline>,
    /// Fetcher used by the diagnostic probes
    pub diagnostics: Arc<dyn PageFetcher>,
    /// Configuration the pipeline was built from
    pub config: Arc<ScraperConfig>,
}

impl AppState {
    /// Builds the HTTP-backed state: the main pipeline and the diagnostic fetcher.
    pub fn from_config(config: ScraperConfig) -> Self {
        Self {
            pipeline: Arc::new(TweetPipeline::from_config(&config)),
            diagnostics: Arc::new(HttpFetcher::diagnostic(&config)),
            config: Arc::new(config),
        }
    }
}

/// Builds the application router with all routes, without middleware layers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/api/v1/tweets/:tweet_id", get(handle_get_tweet))
        .route("/api/v1/verify-tweet", get(handle_verify_tweet))
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/scraping/test", get(handle_scraping_test))
        .route("/api/v1/scraping/debug/:tweet_id", get(handle_scraping_debug))
        .with_state(state)
}

fn bad_request(detail: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail })))
}

/// Handles GET requests to the root `/` endpoint.
///
/// # Example Response
///
/// ```json
/// {
///   "message": "Tweetcheck Twitter Verification API",
///   "version": "0.1.0",
///   "description": "API for verifying tweet existence without authenticated API access"
/// }
/// ```
pub async fn handle_root() -> Json<Value> {
    Json(json!({
        "message": "Tweetcheck Twitter Verification API",
        "version": SERVICE_VERSION,
        "description": "API for verifying tweet existence without authenticated API access"
    }))
}

/// Handles GET requests to the `/health` endpoint.
///
/// Returns `{"status": "healthy", "timestamp": "<RFC 3339>"}` while the service
/// is running. Used by load balancers and monitoring.
pub async fn handle_health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handles GET requests to `/api/v1/tweets/:tweet_id`.
///
/// The path segment may be a bare id or a URL-encoded tweet URL. Scraping never
/// fails the request: a tweet that cannot be found on any source comes back as
/// the not-found record.
///
/// # Returns
///
/// - `Ok(Json<TweetRecord>)`: The record
/// - `Err((StatusCode::BAD_REQUEST, ...))`: If the identifier is malformed
pub async fn handle_get_tweet(
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> Result<Json<TweetRecord>, ApiError> {
    let clean_id = normalize(&tweet_id).map_err(|e| {
        warn!("{}", sanitize_for_logging(&e.to_string(), 200));
        bad_request("Invalid tweet ID format")
    })?;

    info!("Tweet lookup requested for {}", clean_id);
    Ok(Json(state.pipeline.fetch_tweet(&clean_id).await))
}

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    pub url: Option<String>,
}

/// Handles GET requests to `/api/v1/verify-tweet?url=<tweet url>`.
///
/// # Success Response
///
/// ```json
/// {
///   "verified": true,
///   "tweet_id": "20",
///   "data": { "tweetId": "20", "authorUsername": "jack", ... },
///   "message": "Tweet verified successfully"
/// }
/// ```
///
/// `data` is `null` and `message` is `"Tweet not found"` when the tweet could not
/// be found.
pub async fn handle_verify_tweet(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<Json<Value>, ApiError> {
    let url = params
        .url
        .ok_or_else(|| bad_request("Missing 'url' query parameter"))?;
    let tweet_id = normalize(&url).map_err(|e| {
        warn!("{}", sanitize_for_logging(&e.to_string(), 200));
        bad_request("Invalid tweet URL or ID format")
    })?;

    info!("Verification requested for tweet {}", tweet_id);
    let record = state.pipeline.fetch_tweet(&tweet_id).await;
    let (data, message) = if record.exists {
        (json!(record), "Tweet verified successfully")
    } else {
        (Value::Null, "Tweet not found")
    };

    Ok(Json(json!({
        "verified": record.exists,
        "tweet_id": tweet_id,
        "data": data,
        "message": message
    })))
}

/// Handles GET requests to `/api/v1/status`: scraping configuration summary.
pub async fn handle_status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "verification_method": "web_scraping",
        "twitter_base_url": format!("https://{}", CANONICAL_HOST),
        "user_agents_count": state.config.user_agents.len(),
        "mirror_hosts_count": state.config.mirror_hosts.len(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": SERVICE_VERSION
    }))
}

/// Handles GET requests to `/api/v1/scraping/test`.
///
/// Runs the full pipeline on a well-known tweet and reports whether scraping
/// currently works (`"working"`) or only partially (`"limited"`).
pub async fn handle_scraping_test(State(state): State<AppState>) -> Json<Value> {
    let record = state.pipeline.fetch_tweet(SELF_TEST_TWEET_ID).await;

    let preview = if record.tweet_text.chars().count() > 50 {
        format!("{}...", truncate_chars(&record.tweet_text, 50))
    } else {
        record.tweet_text.clone()
    };

    let scraping_status = if record.exists { "working" } else { "limited" };

    Json(json!({
        "scraping_status": scraping_status,
        "test_tweet_id": SELF_TEST_TWEET_ID,
        "test_result": {
            "exists": record.exists,
            "author": record.author_username,
            "has_text": !record.tweet_text.is_empty(),
            "text_preview": preview
        },
        "user_agent": state.pipeline.fetcher().sample_user_agent(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handles GET requests to `/api/v1/scraping/debug/:tweet_id`.
///
/// Probes every candidate with the diagnostic fetcher and reports status code,
/// title, meta descriptions and tweet-content signals per URL, followed by the
/// outcome of a regular pipeline run.
pub async fn handle_scraping_debug(
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let clean_id = normalize(&tweet_id).map_err(|_| bad_request("Invalid tweet ID format"))?;
    let report = run_diagnostics(&state.pipeline, state.diagnostics.as_ref(), &clean_id).await;
    Ok(Json(json!(report)))
}
