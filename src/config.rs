//! Configuration module for the tweetcheck service.
//!
//! This module holds the scraping configuration (user-agent pool, mirror hosts,
//! timeouts, request jitter) and the environment variable handling for the server.

use log::{debug, info, warn};
use std::env;
use std::time::Duration;

/// Public host of the X web app.
pub const CANONICAL_HOST: &str = "x.com";

/// Legacy Twitter host, still served alongside the canonical one.
pub const LEGACY_HOST: &str = "twitter.com";

const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) Gecko/20100101 Firefox/121.0",
];

const DEFAULT_MIRROR_HOSTS: &[&str] = &["nitter.net", "nitter.poast.org", "nitter.privacydev.net"];

const DEFAULT_GUESS_HANDLES: &[&str] = &["twitter", "x", "elonmusk", "jack", "verified"];

/// Immutable scraping configuration shared by the source list builder and the fetchers.
///
/// The defaults carry the built-in user-agent pool, mirror front-end hosts and
/// well-known handles. [`ScraperConfig::from_env`] overrides individual values from
/// the environment.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Pool of browser user agents, one picked at random per request
    pub user_agents: Vec<String>,
    /// Mirror front-end hosts, tried first and in order
    pub mirror_hosts: Vec<String>,
    /// Handles used to guess `/<handle>/status/<id>` URLs as a last resort
    pub guess_handles: Vec<String>,
    /// Per-request timeout on the main pipeline path
    pub request_timeout: Duration,
    /// Per-request timeout on the diagnostic path
    pub diagnostic_timeout: Duration,
    /// Lower bound of the random delay before each request
    pub jitter_min: Duration,
    /// Upper bound of the random delay before each request
    pub jitter_max: Duration,
    /// Fixed delay before each diagnostic probe
    pub diagnostic_delay: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agents: to_owned_list(DEFAULT_USER_AGENTS),
            mirror_hosts: to_owned_list(DEFAULT_MIRROR_HOSTS),
            guess_handles: to_owned_list(DEFAULT_GUESS_HANDLES),
            request_timeout: Duration::from_secs(30),
            diagnostic_timeout: Duration::from_secs(15),
            jitter_min: Duration::from_millis(500),
            jitter_max: Duration::from_millis(2000),
            diagnostic_delay: Duration::from_millis(500),
        }
    }
}

impl ScraperConfig {
    /// Creates a new `ScraperConfig` from the defaults, overridden by environment variables.
    ///
    /// # Optional Environment Variables
    ///
    /// - `TWEETCHECK_MIRROR_HOSTS`: Comma-separated mirror front-end hosts
    /// - `TWEETCHECK_USER_AGENTS`: `|`-separated user-agent pool
    /// - `TWEETCHECK_TIMEOUT_SECS`: Main path request timeout (default 30)
    /// - `TWEETCHECK_DEBUG_TIMEOUT_SECS`: Diagnostic request timeout (default 15)
    /// - `TWEETCHECK_JITTER_MIN_MS`: Minimum pre-request delay (default 500)
    /// - `TWEETCHECK_JITTER_MAX_MS`: Maximum pre-request delay (default 2000)
    ///
    /// Unparseable numbers are logged and ignored.
    ///
    /// # Returns
    ///
    /// - `Ok(ScraperConfig)`: The resulting configuration
    /// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If a list override is empty
    ///   or the jitter bounds are inverted
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        info!("Loading scraper configuration from environment variables");
        let mut config = Self::default();

        if let Some(hosts) = read_list("TWEETCHECK_MIRROR_HOSTS", ',') {
            if hosts.is_empty() {
                return Err("TWEETCHECK_MIRROR_HOSTS is set but contains no hosts".into());
            }
            info!("Using {} mirror hosts from environment", hosts.len());
            config.mirror_hosts = hosts;
        }

        if let Some(agents) = read_list("TWEETCHECK_USER_AGENTS", '|') {
            if agents.is_empty() {
                return Err("TWEETCHECK_USER_AGENTS is set but contains no user agents".into());
            }
            info!("Using {} user agents from environment", agents.len());
            config.user_agents = agents;
        }

        if let Some(secs) = read_number("TWEETCHECK_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = read_number("TWEETCHECK_DEBUG_TIMEOUT_SECS") {
            config.diagnostic_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = read_number("TWEETCHECK_JITTER_MIN_MS") {
            config.jitter_min = Duration::from_millis(ms);
        }
        if let Some(ms) = read_number("TWEETCHECK_JITTER_MAX_MS") {
            config.jitter_max = Duration::from_millis(ms);
        }

        if config.jitter_min > config.jitter_max {
            return Err(format!(
                "Jitter bounds are inverted: min {:?} > max {:?}",
                config.jitter_min, config.jitter_max
            )
            .into());
        }

        debug!("Scraper configuration: {:?}", config);
        Ok(config)
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn read_list(name: &str, separator: char) -> Option<Vec<String>> {
    let raw = env::var(name).ok()?;
    Some(
        raw.split(separator)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    )
}

fn read_number(name: &str) -> Option<u64> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring {}='{}': {}", name, raw, e);
            None
        }
    }
}

/// Gets the server port from environment variables.
///
/// Reads the `PORT` environment variable; falls back to 3000 when it is unset
/// or not a valid port number.
///
/// # Returns
///
/// The port number as a `u16`.
pub fn get_server_port() -> u16 {
    match env::var("PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("PORT '{}' is not a valid port number, using 3000", raw);
            3000
        }),
        Err(_) => 3000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = ScraperConfig::default();
        assert_eq!(config.user_agents.len(), 5);
        assert_eq!(config.mirror_hosts[0], "nitter.net");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.diagnostic_timeout, Duration::from_secs(15));
        assert_eq!(config.jitter_min, Duration::from_millis(500));
        assert_eq!(config.jitter_max, Duration::from_millis(2000));
    }

    #[test]
    fn from_env_overrides_and_validates() {
        std::env::set_var("TWEETCHECK_MIRROR_HOSTS", " mirror.one , mirror.two,");
        std::env::set_var("TWEETCHECK_TIMEOUT_SECS", "not-a-number");
        std::env::set_var("TWEETCHECK_JITTER_MIN_MS", "0");
        std::env::set_var("TWEETCHECK_JITTER_MAX_MS", "10");

        let config = ScraperConfig::from_env().unwrap();
        assert_eq!(config.mirror_hosts, vec!["mirror.one", "mirror.two"]);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.jitter_max, Duration::from_millis(10));

        std::env::set_var("TWEETCHECK_JITTER_MIN_MS", "50");
        assert!(ScraperConfig::from_env().is_err());

        std::env::set_var("TWEETCHECK_MIRROR_HOSTS", " , ");
        std::env::remove_var("TWEETCHECK_JITTER_MIN_MS");
        assert!(ScraperConfig::from_env().is_err());

        std::env::remove_var("TWEETCHECK_MIRROR_HOSTS");
        std::env::remove_var("TWEETCHECK_TIMEOUT_SECS");
        std::env::remove_var("TWEETCHECK_JITTER_MAX_MS");
    }
}
