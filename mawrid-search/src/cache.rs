//! In-memory cache for merged search results.
//!
//! Caches the final deduplicated, scored, sorted results keyed by the
//! (normalised query, sorted provider set) pair. Uses [`moka`] for
//! async-friendly caching with TTL and automatic eviction.

use std::time::Duration;

use moka::future::Cache;

use crate::types::{SearchProvider, SearchResult};

/// Maximum number of cached search result sets.
pub const MAX_CACHE_ENTRIES: u64 = 100;

/// Composite cache key: normalised query + provider set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Lowercased query with whitespace runs collapsed.
    query: String,
    /// Sorted, de-duplicated provider names.
    providers: Vec<&'static str>,
}

impl CacheKey {
    /// Build a deterministic cache key from a query and provider list.
    ///
    /// `[Serper, Brave]` and `[Brave, Serper]` produce the same key.
    pub fn new(query: &str, providers: &[SearchProvider]) -> Self {
        let query = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        let mut providers: Vec<&'static str> = providers.iter().map(|p| p.name()).collect();
        providers.sort_unstable();
        providers.dedup();
        Self { query, providers }
    }
}

/// Search result cache owned by whoever runs searches.
///
/// A TTL of 0 disables caching: lookups always miss and inserts are
/// dropped.
#[derive(Clone)]
pub struct ResultCache {
    inner: Option<Cache<CacheKey, Vec<SearchResult>>>,
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("enabled", &self.inner.is_some())
            .field("entries", &self.entry_count())
            .finish()
    }
}

impl ResultCache {
    /// Create a cache whose entries expire after `ttl_seconds`.
    pub fn new(ttl_seconds: u64) -> Self {
        let inner = (ttl_seconds > 0).then(|| {
            Cache::builder()
                .max_capacity(MAX_CACHE_ENTRIES)
                .time_to_live(Duration::from_secs(ttl_seconds))
                .build()
        });
        Self { inner }
    }

    /// Whether this cache stores anything at all.
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Look up cached results. Returns `None` on a miss or when disabled.
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<SearchResult>> {
        match &self.inner {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    /// Store results under `key`.
    pub async fn insert(&self, key: CacheKey, results: Vec<SearchResult>) {
        if let Some(cache) = &self.inner {
            cache.insert(key, results).await;
        }
    }

    /// Approximate number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.inner.as_ref().map_or(0, Cache::entry_count)
    }
}
