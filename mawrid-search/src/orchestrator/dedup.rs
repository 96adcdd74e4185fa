//! Result deduplication by normalised URL.
//!
//! Groups results that refer to the same page and keeps the highest-scored
//! entry per URL, recording which providers returned it so the scoring
//! module can apply a multi-provider boost.

use std::collections::HashMap;

use crate::types::{SearchProvider, SearchResult};

use super::url_normalize::normalize_url;

/// A search result after deduplication, with the providers that returned
/// the same URL.
#[derive(Debug, Clone)]
pub struct DeduplicatedResult {
    /// The best (highest-scored) result for this URL.
    pub result: SearchResult,
    /// Every provider that returned this URL, in first-seen order.
    pub providers: Vec<SearchProvider>,
}

/// Deduplicate search results by normalised URL.
///
/// Output order follows the first occurrence of each URL. Callers sort by
/// score after applying the boost.
pub fn deduplicate(results: Vec<SearchResult>) -> Vec<DeduplicatedResult> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<DeduplicatedResult> = Vec::new();

    for result in results {
        let key = normalize_url(&result.url);
        let provider = SearchProvider::from_name(&result.provider);

        match index.get(&key) {
            Some(&i) => {
                let group = &mut groups[i];
                if let Some(p) = provider {
                    if !group.providers.contains(&p) {
                        group.providers.push(p);
                    }
                }
                if result.score > group.result.score {
                    group.result = result;
                }
            }
            None => {
                index.insert(key, groups.len());
                groups.push(DeduplicatedResult {
                    result,
                    providers: provider.into_iter().collect(),
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(url: &str, provider: SearchProvider, score: f64) -> SearchResult {
        let mut result = SearchResult::new(provider, 0, format!("Title from {provider}"), url, "");
        result.score = score;
        result
    }

    #[test]
    fn unique_urls_pass_through_in_order() {
        let deduped = deduplicate(vec![
            make_result("https://a.com", SearchProvider::Serper, 1.0),
            make_result("https://b.com", SearchProvider::Brave, 0.8),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].result.url, "https://a.com");
    }

    #[test]
    fn highest_score_kept() {
        let deduped = deduplicate(vec![
            make_result("https://example.com", SearchProvider::Brave, 0.5),
            make_result("https://example.com", SearchProvider::Serper, 1.5),
        ]);
        assert_eq!(deduped.len(), 1);
        assert!((deduped[0].result.score - 1.5).abs() < f64::EPSILON);
        assert_eq!(deduped[0].result.provider, "Serper");
        assert_eq!(
            deduped[0].providers,
            vec![SearchProvider::Brave, SearchProvider::Serper]
        );
    }

    #[test]
    fn normalisation_merges_equivalent_urls() {
        let deduped = deduplicate(vec![
            make_result("https://www.Example.COM/path/", SearchProvider::Serper, 1.0),
            make_result("https://example.com/path?utm_source=x", SearchProvider::Tavily, 0.9),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].providers.len(), 2);
    }

    #[test]
    fn same_provider_duplicate_not_listed_twice() {
        let deduped = deduplicate(vec![
            make_result("https://example.com", SearchProvider::Serper, 1.0),
            make_result("https://example.com/", SearchProvider::Serper, 0.9),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].providers, vec![SearchProvider::Serper]);
    }

    #[test]
    fn unknown_provider_name_still_deduplicates() {
        let mut stranger = make_result("https://example.com", SearchProvider::Brave, 1.0);
        stranger.provider = "Elsewhere".into();
        let deduped = deduplicate(vec![
            stranger,
            make_result("https://example.com", SearchProvider::Brave, 0.8),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].providers, vec![SearchProvider::Brave]);
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(deduplicate(vec![]).is_empty());
    }
}
