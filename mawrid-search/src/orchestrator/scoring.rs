//! Weighted scoring with position decay and keyword relevance.
//!
//! ```text
//! score = provider_weight * position_decay + relevance
//! position_decay = 1.0 / (1.0 + position * 0.1)
//! relevance = 0.3 per query term in the title
//!           + 0.1 per query term in the snippet or content
//! ```
//!
//! URLs returned by several providers are boosted after deduplication by
//! `1.0 + 0.2 * (providers - 1)`.

use crate::types::{SearchProvider, SearchResult};

/// Relevance added for each query term found in the title.
pub const TITLE_TERM_BONUS: f64 = 0.3;

/// Relevance added for each query term found in the snippet or content.
pub const BODY_TERM_BONUS: f64 = 0.1;

/// Boost per additional provider that returned the same URL.
pub const MULTI_PROVIDER_BOOST: f64 = 0.2;

/// Query terms shorter than this many chars are ignored for relevance.
const MIN_TERM_CHARS: usize = 3;

/// Lowercase, distinct query terms used for relevance scoring.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in query.to_lowercase().split_whitespace() {
        if term.chars().count() >= MIN_TERM_CHARS && !terms.iter().any(|t| t == term) {
            terms.push(term.to_owned());
        }
    }
    terms
}

/// Position decay times provider weight.
///
/// Unknown provider names fall back to a weight of 1.0.
pub fn base_score(result: &SearchResult) -> f64 {
    let weight = SearchProvider::from_name(&result.provider).map_or(1.0, |p| p.weight());
    weight / (1.0 + result.position as f64 * 0.1)
}

/// Keyword relevance of `result` for the given terms.
pub fn relevance(result: &SearchResult, terms: &[String]) -> f64 {
    let title = result.title.to_lowercase();
    let snippet = result.snippet.to_lowercase();
    let content = result.content.as_deref().map(str::to_lowercase);

    terms
        .iter()
        .map(|term| {
            let in_title = title.contains(term.as_str());
            let in_body = snippet.contains(term.as_str())
                || content.as_deref().is_some_and(|c| c.contains(term.as_str()));
            let mut bonus = 0.0;
            if in_title {
                bonus += TITLE_TERM_BONUS;
            }
            if in_body {
                bonus += BODY_TERM_BONUS;
            }
            bonus
        })
        .sum()
}

/// Score every result from one provider in place.
pub fn score_results(mut results: Vec<SearchResult>, terms: &[String]) -> Vec<SearchResult> {
    for result in &mut results {
        result.score = base_score(result) + relevance(result, terms);
    }
    results
}

/// Boost a deduplicated score by how many providers returned the URL.
pub fn apply_multi_provider_boost(score: f64, provider_count: usize) -> f64 {
    let extra = provider_count.saturating_sub(1) as f64;
    score * (1.0 + MULTI_PROVIDER_BOOST * extra)
}
