//! Request parameters, response bodies and request statistics.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use mawrid_search::SearchResult;
use serde::{Deserialize, Serialize};

/// Default page size for `/api/search`.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Largest page size accepted by `/api/search`.
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Query string for `/api/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchParams {
    /// Requested page size clamped to `1..=100`.
    pub fn page_size(&self) -> usize {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);
        usize::try_from(limit).unwrap_or(1)
    }

    /// Number of ranked results to skip. Negative offsets count as 0.
    pub fn skip(&self) -> usize {
        self.offset
            .and_then(|o| usize::try_from(o).ok())
            .unwrap_or(0)
    }
}

/// Query string for `/api/suggestions`.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestionParams {
    #[serde(default)]
    pub query: String,
    pub limit: Option<i64>,
}

/// Query string for `/api/answer`.
#[derive(Debug, Default, Deserialize)]
pub struct AnswerParams {
    #[serde(default)]
    pub query: String,
}

/// Body of `/api/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The trimmed query.
    pub query: String,
    /// The requested page of ranked results.
    pub results: Vec<SearchResult>,
    /// Ranked results available before paging.
    pub total_results: usize,
    /// Wall time spent on the request, in seconds.
    pub processing_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Body of `/api/suggestions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// Body of `/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub app_name: String,
    pub version: String,
}

/// Body of every 4xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `/api/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStats {
    /// Searches handled since start-up, including failed ones.
    pub total_searches: u64,
    /// Most recent search query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_search: Option<String>,
    /// Queries memoised by the suggestion engine.
    pub suggestion_cache_entries: usize,
    /// Distinct result domains seen, sorted.
    pub domains: Vec<String>,
    pub uptime_seconds: u64,
}

/// Volatile counters behind `/api/stats`.
#[derive(Debug)]
pub struct StatsTracker {
    started: Instant,
    total_searches: AtomicU64,
    last_search: Mutex<Option<String>>,
    domains: Mutex<BTreeSet<String>>,
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self {
            started: Instant::now(),
            total_searches: AtomicU64::new(0),
            last_search: Mutex::new(None),
            domains: Mutex::new(BTreeSet::new()),
        }
    }
}

impl StatsTracker {
    /// Count a search and remember its query.
    pub fn record_search(&self, query: &str) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
        *lock(&self.last_search) = Some(query.to_owned());
    }

    /// Add the domains of `results` to the seen set.
    pub fn record_domains(&self, results: &[SearchResult]) {
        lock(&self.domains).extend(
            results
                .iter()
                .filter(|r| !r.domain.is_empty())
                .map(|r| r.domain.clone()),
        );
    }

    /// Current counters.
    pub fn snapshot(&self, suggestion_cache_entries: usize) -> SearchStats {
        SearchStats {
            total_searches: self.total_searches.load(Ordering::Relaxed),
            last_search: lock(&self.last_search).clone(),
            suggestion_cache_entries,
            domains: lock(&self.domains).iter().cloned().collect(),
            uptime_seconds: self.started.elapsed().as_secs(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
