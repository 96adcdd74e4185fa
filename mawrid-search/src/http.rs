//! Shared HTTP client for provider requests and page fetches.

use crate::config::SearchConfig;
use crate::error::SearchError;
use std::time::Duration;

/// User-Agent sent when the config does not set one.
pub const DEFAULT_USER_AGENT: &str = concat!("mawrid-search/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] for provider APIs and page downloads.
///
/// The client has:
/// - Timeout from config
/// - Custom User-Agent if configured, [`DEFAULT_USER_AGENT`] otherwise
/// - Brotli and gzip decompression
/// - At most 10 redirects
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}
