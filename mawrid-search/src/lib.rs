//! # mawrid-search
//!
//! Search core for Mawrid: provider clients, result ranking, snippets and
//! autocomplete.
//!
//! ## Design
//!
//! - Queries Serper, Brave and Tavily JSON APIs concurrently and merges,
//!   deduplicates and ranks their results
//! - Rewrites each result's snippet to the most query-dense window of its
//!   document text
//! - Generates autocomplete suggestions from static pattern tables with a
//!   bounded, insertion-order memoisation cache
//! - In-memory result cache with configurable TTL
//! - Graceful degradation: if some providers fail, others still return
//!   results
//!
//! ## Security
//!
//! - API keys never appear in error messages or logs
//! - Search queries are logged only at trace level

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod snippet;
pub mod suggest;
pub mod types;

pub use cache::{CacheKey, ResultCache};
pub use config::{ProviderEndpoint, SearchConfig};
pub use content::{extract_content, fetch_page_content};
pub use error::{Result, SearchError};
pub use provider::SearchProviderTrait;
pub use snippet::extract_snippet;
pub use suggest::SuggestionEngine;
pub use types::{PageContent, SearchProvider, SearchResult};

/// Search the web using every provider in `config` concurrently.
///
/// Merges and ranks results by weighted score, deduplicates by URL, and
/// returns up to `config.max_results` post-processed results. Does not
/// cache; see [`SearchClient`] for that.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid config or blank query, and
/// [`SearchError::AllProvidersFailed`] if every enabled provider fails.
/// Individual provider failures are logged but do not fail the search as
/// long as one provider succeeds.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> mawrid_search::Result<()> {
/// let mut config = mawrid_search::SearchConfig::default();
/// config.serper.api_key = Some("serper-key".into());
/// let results = mawrid_search::search("rust programming", &config).await?;
/// for result in &results {
///     println!("{}: {}", result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<Vec<SearchResult>> {
    config.validate()?;
    if query.trim().is_empty() {
        return Err(SearchError::Config("query must not be empty".into()));
    }
    orchestrator::search::orchestrate_search(query.trim(), config).await
}

/// A search entry point that owns its config and a [`ResultCache`].
#[derive(Debug, Clone)]
pub struct SearchClient {
    config: SearchConfig,
    cache: ResultCache,
}

impl SearchClient {
    /// Validate `config` and build a client with a cache sized from it.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the config is invalid.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let cache = ResultCache::new(config.cache_ttl_seconds);
        Ok(Self { config, cache })
    }

    /// The config this client searches with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search, serving repeated queries from the cache.
    ///
    /// Only successful searches are cached.
    ///
    /// # Errors
    ///
    /// Same as [`search`].
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let key = CacheKey::new(query, &self.config.providers);
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(count = hit.len(), "search cache hit");
            return Ok(hit);
        }

        let results = search(query, &self.config).await?;
        self.cache.insert(key, results.clone()).await;
        Ok(results)
    }

    /// Approximate number of cached result sets.
    pub fn cached_searches(&self) -> u64 {
        self.cache.entry_count()
    }
}
