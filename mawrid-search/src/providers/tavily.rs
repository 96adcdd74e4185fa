//! Tavily provider: search results with extracted page content.

use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProviderTrait;
use crate::types::{SearchProvider, SearchResult};

use super::read_json;

/// Tavily rejects `max_results` above this value.
const MAX_RESULTS: usize = 20;

/// Tavily search client. The API key travels in the request body.
pub struct TavilyProvider;

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    raw_content: Option<String>,
}

impl SearchProviderTrait for TavilyProvider {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Tavily search");

        let api_key = config.api_key(SearchProvider::Tavily)?;
        let client = http::build_client(config)?;

        let response = client
            .post(config.tavily.url("/search"))
            .json(&serde_json::json!({
                "api_key": api_key,
                "query": query,
                "max_results": config.max_results.min(MAX_RESULTS),
                "include_raw_content": true,
            }))
            .send()
            .await
            .map_err(|e| SearchError::from_transport("Tavily", &e))?;

        let body: TavilyResponse = read_json(SearchProvider::Tavily, response).await?;
        Ok(map_results(body, config.max_results))
    }

    fn provider_type(&self) -> SearchProvider {
        SearchProvider::Tavily
    }
}

fn map_results(body: TavilyResponse, max_results: usize) -> Vec<SearchResult> {
    let results: Vec<SearchResult> = body
        .results
        .into_iter()
        .filter(|item| !item.url.is_empty())
        .take(max_results)
        .enumerate()
        .map(|(position, item)| {
            let mut result = SearchResult::new(
                SearchProvider::Tavily,
                position,
                item.title.trim(),
                item.url,
                item.content.trim(),
            );
            result.content = item.raw_content.filter(|raw| !raw.trim().is_empty());
            result
        })
        .collect();

    tracing::debug!(count = results.len(), "Tavily results parsed");
    results
}
