//! Brave Search API provider: independent index.

use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProviderTrait;
use crate::types::{SearchProvider, SearchResult};

use super::{read_json, strip_markup};

/// Brave rejects `count` above this value.
const MAX_COUNT: usize = 20;

/// Brave Search API client.
pub struct BraveProvider;

#[derive(Debug, Default, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: BraveWeb,
}

#[derive(Debug, Default, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    extra_snippets: Vec<String>,
}

impl SearchProviderTrait for BraveProvider {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Brave search");

        let api_key = config.api_key(SearchProvider::Brave)?;
        let client = http::build_client(config)?;
        let count = config.max_results.min(MAX_COUNT).to_string();

        let response = client
            .get(config.brave.url("/res/v1/web/search"))
            .query(&[("q", query), ("count", count.as_str())])
            .header("Accept", "application/json")
            .header("X-Subscription-Token", api_key)
            .send()
            .await
            .map_err(|e| SearchError::from_transport("Brave", &e))?;

        let body: BraveResponse = read_json(SearchProvider::Brave, response).await?;
        Ok(map_results(body, config.max_results))
    }

    fn provider_type(&self) -> SearchProvider {
        SearchProvider::Brave
    }
}

fn map_results(body: BraveResponse, max_results: usize) -> Vec<SearchResult> {
    let results: Vec<SearchResult> = body
        .web
        .results
        .into_iter()
        .filter(|item| !item.url.is_empty())
        .take(max_results)
        .enumerate()
        .map(|(position, item)| {
            let description = strip_markup(&item.description);
            // Extra snippets give the snippet extractor more text to work with.
            let content = (!item.extra_snippets.is_empty()).then(|| {
                std::iter::once(description.clone())
                    .chain(item.extra_snippets.iter().map(|s| strip_markup(s)))
                    .collect::<Vec<_>>()
                    .join(" ")
            });
            let mut result = SearchResult::new(
                SearchProvider::Brave,
                position,
                strip_markup(&item.title),
                item.url,
                description,
            );
            result.content = content;
            result
        })
        .collect();

    tracing::debug!(count = results.len(), "Brave results parsed");
    results
}
