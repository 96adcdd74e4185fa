//! Serper.dev provider: Google results as JSON.

use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProviderTrait;
use crate::types::{SearchProvider, SearchResult};

use super::read_json;

/// Serper caps `num` at this value.
const MAX_NUM: usize = 100;

/// Serper.dev search client.
///
/// Highest-weighted provider: Google's ranking is the strongest signal we
/// have.
pub struct SerperProvider;

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperOrganic>,
}

#[derive(Debug, Deserialize)]
struct SerperOrganic {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    /// 1-based rank.
    position: Option<usize>,
}

impl SearchProviderTrait for SerperProvider {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Serper search");

        let api_key = config.api_key(SearchProvider::Serper)?;
        let client = http::build_client(config)?;

        let response = client
            .post(config.serper.url("/search"))
            .header("X-API-KEY", api_key)
            .json(&serde_json::json!({
                "q": query,
                "num": config.max_results.min(MAX_NUM),
            }))
            .send()
            .await
            .map_err(|e| SearchError::from_transport("Serper", &e))?;

        let body: SerperResponse = read_json(SearchProvider::Serper, response).await?;
        Ok(map_results(body, config.max_results))
    }

    fn provider_type(&self) -> SearchProvider {
        SearchProvider::Serper
    }
}

fn map_results(body: SerperResponse, max_results: usize) -> Vec<SearchResult> {
    let results: Vec<SearchResult> = body
        .organic
        .into_iter()
        .filter(|item| !item.link.is_empty())
        .take(max_results)
        .enumerate()
        .map(|(index, item)| {
            let position = item.position.map_or(index, |p| p.saturating_sub(1));
            SearchResult::new(
                SearchProvider::Serper,
                position,
                item.title.trim(),
                item.link,
                item.snippet.trim(),
            )
        })
        .collect();

    tracing::debug!(count = results.len(), "Serper results parsed");
    results
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> SearchConfig {
        let mut config = SearchConfig::default();
        config.serper.base_url = server.uri();
        config.serper.api_key = Some("serper-test-key".into());
        config
    }

    #[tokio::test]
    async fn maps_organic_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("X-API-KEY", "serper-test-key"))
            .and(body_partial_json(json!({"q": "rust async", "num": 20})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "searchParameters": {"q": "rust async"},
                "organic": [
                    {
                        "title": "Async Book",
                        "link": "https://rust-lang.github.io/async-book/",
                        "snippet": "Asynchronous programming in Rust",
                        "position": 1
                    },
                    {
                        "title": "Tokio",
                        "link": "https://www.tokio.rs/",
                        "snippet": "An asynchronous runtime",
                        "position": 2
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = SerperProvider
            .search("rust async", &config_for(&server))
            .await
            .expect("search should succeed");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Async Book");
        assert_eq!(results[0].position, 0);
        assert_eq!(results[1].position, 1);
        assert_eq!(results[1].domain, "tokio.rs");
        assert_eq!(results[1].provider, "Serper");
    }

    #[tokio::test]
    async fn missing_organic_block_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let results = SerperProvider
            .search("nothing", &config_for(&server))
            .await
            .expect("search should succeed");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = SerperProvider
            .search("rust", &config_for(&server))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Auth(_)));
        assert!(!err.to_string().contains("serper-test-key"));
    }

    #[tokio::test]
    async fn malformed_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = SerperProvider
            .search("rust", &config_for(&server))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[tokio::test]
    async fn missing_key_fails_without_a_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.serper.api_key = None;
        let err = SerperProvider.search("rust", &config).await.unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn results_without_links_are_skipped() {
        let body = SerperResponse {
            organic: vec![
                SerperOrganic {
                    title: "No link".into(),
                    link: String::new(),
                    snippet: String::new(),
                    position: Some(1),
                },
                SerperOrganic {
                    title: "Linked".into(),
                    link: "https://example.com".into(),
                    snippet: "text".into(),
                    position: None,
                },
            ],
        };
        let results = map_results(body, 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].position, 0);
    }
}
