//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which providers are queried, their credentials
//! and endpoints, timeouts, result caching and page fetching.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::SearchProvider;

/// Credentials and endpoint for one search provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderEndpoint {
    /// API key sent to the provider. `None` disables the provider at query time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL without a trailing slash. Overridable for self-hosted proxies
    /// and tests.
    pub base_url: String,
}

impl ProviderEndpoint {
    fn with_base(base_url: &str) -> Self {
        Self {
            api_key: None,
            base_url: base_url.to_owned(),
        }
    }

    /// Join `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Configuration for a search operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Providers to query concurrently; results are merged.
    pub providers: Vec<SearchProvider>,
    /// Maximum number of results kept after deduplication and ranking.
    pub max_results: usize,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// How long to cache merged results in seconds. 0 disables caching.
    pub cache_ttl_seconds: u64,
    /// Fetch the top result pages and extract snippets from their text.
    pub fetch_page_content: bool,
    /// How many of the top results get their page fetched.
    pub page_fetch_limit: usize,
    /// Custom User-Agent. Defaults to `mawrid-search/<version>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Serper.dev endpoint.
    pub serper: ProviderEndpoint,
    /// Brave Search API endpoint.
    pub brave: ProviderEndpoint,
    /// Tavily endpoint.
    pub tavily: ProviderEndpoint,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            providers: vec![SearchProvider::Serper],
            max_results: 20,
            timeout_seconds: 8,
            cache_ttl_seconds: 600,
            fetch_page_content: false,
            page_fetch_limit: 3,
            user_agent: None,
            serper: ProviderEndpoint::with_base("https://google.serper.dev"),
            brave: ProviderEndpoint::with_base("https://api.search.brave.com"),
            tavily: ProviderEndpoint::with_base("https://api.tavily.com"),
        }
    }
}

impl SearchConfig {
    /// Returns the endpoint settings for `provider`.
    pub fn endpoint(&self, provider: SearchProvider) -> &ProviderEndpoint {
        match provider {
            SearchProvider::Serper => &self.serper,
            SearchProvider::Brave => &self.brave,
            SearchProvider::Tavily => &self.tavily,
        }
    }

    /// Mutable access to the endpoint settings for `provider`.
    pub fn endpoint_mut(&mut self, provider: SearchProvider) -> &mut ProviderEndpoint {
        match provider {
            SearchProvider::Serper => &mut self.serper,
            SearchProvider::Brave => &mut self.brave,
            SearchProvider::Tavily => &mut self.tavily,
        }
    }

    /// Returns the API key for `provider`, or a config error naming it.
    pub fn api_key(&self, provider: SearchProvider) -> Result<&str, SearchError> {
        self.endpoint(provider)
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SearchError::Config(format!("no API key configured for {provider}")))
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `providers` must not be empty
    /// - every provider base URL must be non-empty
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.providers.is_empty() {
            return Err(SearchError::Config(
                "at least one provider must be enabled".into(),
            ));
        }
        for provider in &self.providers {
            if self.endpoint(*provider).base_url.trim().is_empty() {
                return Err(SearchError::Config(format!(
                    "base_url for {provider} must not be empty"
                )));
            }
        }
        Ok(())
    }
}
