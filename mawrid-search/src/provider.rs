//! Trait definition for pluggable search providers.
//!
//! Each web-search API (Serper, Brave, Tavily) implements
//! [`SearchProviderTrait`] so the orchestrator can query them uniformly.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{SearchProvider, SearchResult};

/// A pluggable web-search backend.
///
/// Implementors call a provider's JSON API and map its response into
/// unscored [`SearchResult`] values. Each provider handles its own:
///
/// - request shape and authentication header
/// - status code mapping (auth failures, rate limits)
/// - response parsing
///
/// All implementations must be `Send + Sync` for concurrent queries.
pub trait SearchProviderTrait: Send + Sync {
    /// Perform a web search and return mapped results in provider order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the API key is missing, the request fails,
    /// the provider rejects it, or the response cannot be parsed.
    fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;

    /// Returns which [`SearchProvider`] variant this implementation represents.
    fn provider_type(&self) -> SearchProvider;

    /// Returns the ranking weight for results from this provider.
    fn weight(&self) -> f64 {
        self.provider_type().weight()
    }
}
