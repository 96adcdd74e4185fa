//! Search provider implementations.
//!
//! Each module provides a struct implementing
//! [`crate::provider::SearchProviderTrait`] for one web-search JSON API.

pub mod brave;
pub mod serper;
pub mod tavily;

pub use brave::BraveProvider;
pub use serper::SerperProvider;
pub use tavily::TavilyProvider;

use scraper::Html;
use serde::de::DeserializeOwned;

use crate::error::SearchError;
use crate::types::SearchProvider;

/// Check the status of a provider response and decode its JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: SearchProvider,
    response: reqwest::Response,
) -> Result<T, SearchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::from_status(provider.name(), status));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SearchError::from_transport(provider.name(), &e))?;
    tracing::trace!(%provider, bytes = body.len(), "provider response received");

    serde_json::from_str(&body)
        .map_err(|e| SearchError::Parse(format!("{provider} response: {e}")))
}

/// Plain text of an HTML fragment. Providers highlight matches with inline
/// tags such as `<strong>`.
pub(crate) fn strip_markup(fragment: &str) -> String {
    if !fragment.contains('<') && !fragment.contains('&') {
        return fragment.trim().to_owned();
    }
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_owned()
}
