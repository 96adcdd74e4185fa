//! Error types for the mawrid-search crate.
//!
//! Messages are stable and safe to show to users. Provider API keys never
//! appear in an error message.

/// Errors that can occur while querying search providers or fetching pages.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Every configured provider failed to return results.
    #[error("all search providers failed: {0}")]
    AllProvidersFailed(String),

    /// A provider request timed out.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// An HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider rejected the API key.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The provider is rate limiting this client.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The provider response or page HTML could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Map a `reqwest` transport error, separating timeouts from other failures.
    pub(crate) fn from_transport(provider: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{provider} did not respond in time"))
        } else {
            Self::Http(format!("{provider} request failed: {err}"))
        }
    }

    /// Map a non-success HTTP status returned by a provider.
    pub(crate) fn from_status(provider: &str, status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            401 | 403 => Self::Auth(format!("{provider} rejected the API key")),
            429 => Self::RateLimited(format!("{provider} returned 429")),
            code => Self::Http(format!("{provider} returned HTTP {code}")),
        }
    }
}

/// Convenience type alias for mawrid-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
