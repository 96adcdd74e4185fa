//! Integration tests for the search pipeline against mocked providers.
//!
//! Every provider is served by a local `wiremock` server, so these tests
//! exercise the real request/response mapping, fan-out, dedup, scoring and
//! post-processing without network access.

use mawrid_search::{SearchClient, SearchConfig, SearchError, SearchProvider};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Providers {
    serper: MockServer,
    brave: MockServer,
    tavily: MockServer,
}

impl Providers {
    async fn start() -> Self {
        let serper = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic": [
                    {"title": "Example", "link": "https://example.com/", "snippet": "An example", "position": 1},
                    {"title": "Serper Only", "link": "https://serper-only.com/a", "snippet": "only here", "position": 2}
                ]
            })))
            .mount(&serper)
            .await;

        let brave = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/res/v1/web/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "web": {"results": [
                    {"title": "Example (Brave)", "url": "https://www.example.com", "description": "Example again"},
                    {"title": "Brave Only", "url": "https://brave-only.com", "description": "just brave"}
                ]}
            })))
            .mount(&brave)
            .await;

        let tavily = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {
                        "title": "Example (Tavily)",
                        "url": "https://example.com?utm_source=tavily",
                        "content": "Example content",
                        "raw_content": "Example raw content"
                    }
                ]
            })))
            .mount(&tavily)
            .await;

        Self {
            serper,
            brave,
            tavily,
        }
    }

    fn config(&self) -> SearchConfig {
        let mut config = SearchConfig {
            providers: SearchProvider::all().to_vec(),
            ..Default::default()
        };
        for (provider, server) in [
            (SearchProvider::Serper, &self.serper),
            (SearchProvider::Brave, &self.brave),
            (SearchProvider::Tavily, &self.tavily),
        ] {
            let endpoint = config.endpoint_mut(provider);
            endpoint.base_url = server.uri();
            endpoint.api_key = Some(format!("{provider}-key"));
        }
        config
    }
}

#[tokio::test]
async fn three_providers_merge_into_one_ranked_list() {
    let providers = Providers::start().await;
    let results = mawrid_search::search("example", &providers.config())
        .await
        .expect("search should succeed");

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].domain, "example.com");
    // Serper pos 0 (1.2) + title (0.3) + snippet (0.1), boosted by 3 providers.
    assert!((results[0].score - 1.6 * 1.4).abs() < 1e-9);

    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn max_results_truncates_merged_list() {
    let providers = Providers::start().await;
    let mut config = providers.config();
    config.max_results = 2;

    let results = mawrid_search::search("example", &config)
        .await
        .expect("search should succeed");
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn missing_keys_degrade_to_remaining_providers() {
    let providers = Providers::start().await;
    let mut config = providers.config();
    config.serper.api_key = None;
    config.tavily.api_key = None;

    let results = mawrid_search::search("brave", &config)
        .await
        .expect("brave alone should succeed");
    assert!(results.iter().all(|r| r.provider == "Brave"));
    assert_eq!(results[0].title, "Brave Only");
}

#[tokio::test]
async fn every_provider_failing_reports_each_failure() {
    let config = SearchConfig {
        providers: SearchProvider::all().to_vec(),
        ..Default::default()
    };

    let err = mawrid_search::search("anything", &config).await.unwrap_err();
    let message = match err {
        SearchError::AllProvidersFailed(message) => message,
        other => panic!("expected AllProvidersFailed, got {other}"),
    };
    for provider in SearchProvider::all() {
        assert!(message.contains(provider.name()));
    }
}

#[tokio::test]
async fn client_cache_key_ignores_provider_order() {
    let providers = Providers::start().await;
    let mut config = providers.config();
    let client = SearchClient::new(config.clone()).expect("valid config");
    client.search("example").await.expect("search");

    config.providers.reverse();
    let reordered = SearchClient::new(config).expect("valid config");
    // Separate clients own separate caches.
    assert_eq!(reordered.cached_searches(), 0);
    assert!(reordered.search("example").await.is_ok());
}
