//! Core search orchestrator: concurrent multi-provider fan-out, score,
//! dedup, rank, post-process.

use crate::config::SearchConfig;
use crate::content::fetch_page_content;
use crate::error::SearchError;
use crate::provider::SearchProviderTrait;
use crate::providers::{BraveProvider, SerperProvider, TavilyProvider};
use crate::types::{SearchProvider, SearchResult};

use super::dedup::deduplicate;
use super::postprocess::postprocess;
use super::scoring::{apply_multi_provider_boost, query_terms, score_results};

/// Orchestrate a concurrent search across all enabled providers.
///
/// # Pipeline
///
/// 1. Fan out to every provider in `config.providers` with
///    [`futures::future::join_all`]
/// 2. Log per-provider errors at warn level; collect successful results
/// 3. Score each result by provider weight, position and keyword relevance
/// 4. Deduplicate by normalised URL and boost URLs seen by several providers
/// 5. Sort by final score (descending) and truncate to `config.max_results`
/// 6. Optionally fetch the top pages, then rewrite snippets and content
///
/// # Errors
///
/// Returns [`SearchError::AllProvidersFailed`] only if **every** enabled
/// provider fails. Partial failures are logged but do not prevent results
/// from successful providers being returned.
pub async fn orchestrate_search(
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>, SearchError> {
    let futures: Vec<_> = config
        .providers
        .iter()
        .map(|&provider| async move { (provider, query_provider(provider, query, config).await) })
        .collect();

    let outcomes = futures::future::join_all(futures).await;

    let terms = query_terms(query);
    let mut all_results: Vec<SearchResult> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let mut succeeded = 0usize;

    for (provider, outcome) in outcomes {
        match outcome {
            Ok(results) => {
                succeeded += 1;
                tracing::debug!(%provider, count = results.len(), "provider returned results");
                all_results.extend(score_results(results, &terms));
            }
            Err(err) => {
                tracing::warn!(provider = %provider, error = %err, "provider query failed");
                errors.push(format!("{provider}: {err}"));
            }
        }
    }

    if succeeded == 0 && !errors.is_empty() {
        return Err(SearchError::AllProvidersFailed(errors.join("; ")));
    }

    let mut ranked: Vec<SearchResult> = deduplicate(all_results)
        .into_iter()
        .map(|dr| {
            let mut result = dr.result;
            result.score = apply_multi_provider_boost(result.score, dr.providers.len());
            result
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(config.max_results);

    let pages = fetch_pages(&ranked, config).await;
    Ok(ranked
        .into_iter()
        .zip(pages)
        .map(|(result, page)| postprocess(result, query, page))
        .collect())
}

/// Query a single provider, dispatching to the concrete implementation.
async fn query_provider(
    provider: SearchProvider,
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>, SearchError> {
    match provider {
        SearchProvider::Serper => SerperProvider.search(query, config).await,
        SearchProvider::Brave => BraveProvider.search(query, config).await,
        SearchProvider::Tavily => TavilyProvider.search(query, config).await,
    }
}

/// Page text for each result, in order. Only the first
/// `config.page_fetch_limit` results are fetched, and only when page
/// fetching is enabled; failed fetches yield `None`.
async fn fetch_pages(results: &[SearchResult], config: &SearchConfig) -> Vec<Option<String>> {
    let mut pages: Vec<Option<String>> = vec![None; results.len()];
    if !config.fetch_page_content {
        return pages;
    }

    let limit = config.page_fetch_limit.min(results.len());
    let fetches = results[..limit].iter().map(|r| fetch_page_content(&r.url, config));
    let fetched = futures::future::join_all(fetches).await;

    for (slot, (result, outcome)) in pages.iter_mut().zip(results.iter().zip(fetched)) {
        match outcome {
            Ok(page) => *slot = Some(page.text),
            Err(err) => {
                tracing::debug!(url = %result.url, error = %err, "page fetch failed, using provider text");
            }
        }
    }
    pages
}
