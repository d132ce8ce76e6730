//! # Tweetcheck
//!
//! A Rust web service that verifies whether a tweet exists by scraping public sources,
//! without authenticated Twitter/X API access.
//!
//! ## Environment Variables
//!
//! - `PORT`: Server port (defaults to 3000)
//! - `TWEETCHECK_*`: Scraper overrides, see [`tweetcheck::ScraperConfig::from_env`]
//! - `RUST_LOG`: Log level filter

use log::{error, info};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use tweetcheck::{create_router, get_server_port, AppState, ScraperConfig};

/// Main entry point for the tweetcheck web service.
///
/// Initializes logging, loads the scraper configuration, builds the router with
/// CORS and request tracing, and serves until Ctrl+C.
///
/// # Example Usage
///
/// ```bash
/// # Run with default port 3000
/// cargo run
///
/// # Run on custom port with debug logging
/// PORT=8080 RUST_LOG=debug cargo run
/// ```
#[tokio::main]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    let config = match ScraperConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid scraper configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Scraper configured with {} mirror hosts and {} user agents",
        config.mirror_hosts.len(),
        config.user_agents.len()
    );

    let app = create_router(AppState::from_config(config)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    // Get the server port and bind address
    let port = get_server_port();
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    info!("Starting tweetcheck server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("HTTP server error: {}", e);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received, stopping server");
}
