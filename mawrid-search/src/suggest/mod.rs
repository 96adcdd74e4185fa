//! Pattern-based autocomplete suggestions.
//!
//! [`SuggestionEngine`] turns a partial query into ranked completions built
//! from the static tables in [`patterns`], memoised per normalised query in a
//! bounded [`SuggestionCache`].
//!
//! Ranking puts completions that start with the query first, then orders
//! each group by length, shortest first.

pub mod cache;
pub mod patterns;

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use cache::{SuggestionCache, DEFAULT_CAPACITY};

use patterns::{
    fill, ACTIONS, MODIFIERS, PARTIAL_SUFFIXES, PHRASE_TEMPLATES, QUESTION_COMPLETIONS,
    QUESTION_STARTERS, SINGLE_WORD_TEMPLATES, TAIL_EXTENSIONS, TOPIC_BOOSTS,
};

/// Tail extensions only apply when the last word is longer than this.
const MIN_TAIL_WORD_CHARS: usize = 2;

/// Autocomplete generator owning its memoisation cache.
///
/// Safe to share between request handlers; the cache lock is held only for
/// lookups and inserts, never while candidates are generated.
#[derive(Debug)]
pub struct SuggestionEngine {
    cache: Mutex<SuggestionCache>,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionEngine {
    /// Create an engine whose cache holds [`DEFAULT_CAPACITY`] queries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an engine with a custom cache bound.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: Mutex::new(SuggestionCache::new(capacity)),
        }
    }

    /// Generate up to `limit` suggestions for `query`.
    ///
    /// Never fails. An empty or whitespace-only query yields an empty list
    /// without touching the cache, and no suggestion ever equals the query
    /// itself (ignoring case).
    pub fn generate(&self, query: &str, limit: usize) -> Vec<String> {
        let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        let normalised = words.join(" ");
        if normalised.is_empty() {
            return Vec::new();
        }

        if let Some(hit) = self.lock().get(&normalised) {
            tracing::trace!(query = %normalised, "suggestion cache hit");
            return hit.iter().take(limit).cloned().collect();
        }

        let original = query.trim().to_lowercase();
        let mut seen = HashSet::new();
        let mut suggestions: Vec<String> = candidates(&normalised, &words)
            .into_iter()
            .filter(|c| seen.insert(c.clone()))
            .filter(|c| {
                let lower = c.to_lowercase();
                lower != original && lower != normalised
            })
            .collect();

        suggestions.sort_by_key(|c| {
            let is_prefix = c.to_lowercase().starts_with(&normalised);
            (!is_prefix, c.chars().count())
        });

        tracing::trace!(query = %normalised, count = suggestions.len(), "generated suggestions");

        let result = suggestions.iter().take(limit).cloned().collect();
        if let Some(evicted) = self.lock().insert(normalised, suggestions) {
            tracing::trace!(query = %evicted, "evicted oldest suggestion cache entry");
        }
        result
    }

    /// Number of queries currently memoised.
    pub fn cached_queries(&self) -> usize {
        self.lock().len()
    }

    /// Maximum number of memoised queries.
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Whether `query` (after normalisation) has a cache entry.
    pub fn is_cached(&self, query: &str) -> bool {
        let normalised = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        self.lock().contains(&normalised)
    }

    fn lock(&self) -> MutexGuard<'_, SuggestionCache> {
        // A panic mid-insert leaves the map usable, so recover the guard.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Collect raw candidates for a normalised query, topic boosts first.
fn candidates(query: &str, words: &[String]) -> Vec<String> {
    let mut boosted: Vec<String> = Vec::new();
    let mut pool: Vec<String> = Vec::new();

    if words.len() == 1 {
        pool.extend(SINGLE_WORD_TEMPLATES.iter().map(|t| fill(t, query)));
    } else {
        pool.extend(PHRASE_TEMPLATES.iter().map(|t| fill(t, query)));
        for i in 1..words.len() {
            let lead = words[..i].join(" ");
            pool.extend(PARTIAL_SUFFIXES.iter().map(|s| format!("{lead} {s}")));
        }
    }

    for starter in QUESTION_STARTERS {
        match strip_starter(query, starter) {
            Some(rest) if !rest.is_empty() => {
                pool.extend(
                    QUESTION_COMPLETIONS
                        .iter()
                        .map(|c| format!("{starter} {rest} {c}")),
                );
            }
            Some(_) => {}
            None if !query.contains(starter) => pool.push(format!("{starter} {query}")),
            None => {}
        }
    }

    pool.extend(
        MODIFIERS
            .iter()
            .filter(|m| !query.contains(**m))
            .map(|m| format!("{m} {query}")),
    );
    pool.extend(
        ACTIONS
            .iter()
            .filter(|a| !query.contains(**a))
            .map(|a| format!("{a} {query}")),
    );

    for (trigger, topic) in TOPIC_BOOSTS {
        if query.contains(trigger) {
            boosted.extend(topic.iter().map(|s| (*s).to_owned()));
        }
    }

    let tail_long_enough = words
        .last()
        .is_some_and(|w| w.chars().count() > MIN_TAIL_WORD_CHARS);
    if tail_long_enough {
        pool.extend(
            TAIL_EXTENSIONS
                .iter()
                .filter(|ext| !query.contains(**ext))
                .map(|ext| format!("{query} {ext}")),
        );
    }

    boosted.extend(pool);
    boosted
}

/// The rest of `query` after a leading question starter. A plain prefix
/// test, so `"how tomorrow"` matches `"how to"` with remainder `"morrow"`.
fn strip_starter<'a>(query: &'a str, starter: &str) -> Option<&'a str> {
    query.strip_prefix(starter).map(str::trim_start)
}
