//! Core types for search results and provider identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single search result after provider mapping and post-processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// The URL of the result.
    pub url: String,
    /// Query-focused excerpt of the page content.
    pub snippet: String,
    /// Leading part of the document body, when the provider or a page
    /// fetch supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Host of `url`, without a leading `www.`.
    #[serde(default)]
    pub domain: String,
    /// Which provider returned this result.
    pub provider: String,
    /// 0-based rank within the provider's own result list.
    #[serde(default)]
    pub position: usize,
    /// Aggregated relevance score (higher is better).
    pub score: f64,
}

impl SearchResult {
    /// Build an unscored result from the fields every provider returns.
    pub fn new(
        provider: SearchProvider,
        position: usize,
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        let url = url.into();
        Self {
            title: title.into(),
            domain: domain_of(&url),
            url,
            snippet: snippet.into(),
            content: None,
            provider: provider.name().to_owned(),
            position,
            score: 0.0,
        }
    }
}

/// Extract the host of a URL, dropping a leading `www.`.
///
/// Returns an empty string for unparseable URLs.
pub fn domain_of(raw: &str) -> String {
    url::Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .map(|host| host.strip_prefix("www.").map(str::to_owned).unwrap_or(host))
        .unwrap_or_default()
}

/// Supported web-search providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    /// Serper.dev, Google results as JSON.
    Serper,
    /// Brave Search API, independent index.
    Brave,
    /// Tavily, returns page content alongside results.
    Tavily,
}

impl SearchProvider {
    /// Returns the human-readable name of this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Serper => "Serper",
            Self::Brave => "Brave",
            Self::Tavily => "Tavily",
        }
    }

    /// Returns the ranking weight for results from this provider.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Serper => 1.2,
            Self::Brave => 1.0,
            Self::Tavily => 1.0,
        }
    }

    /// Parse a provider from its display name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Returns all available providers.
    pub fn all() -> &'static [SearchProvider] {
        &[Self::Serper, Self::Brave, Self::Tavily]
    }
}

impl fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extracted readable content from a fetched web page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    /// The URL that was fetched.
    pub url: String,
    /// The page title extracted from HTML.
    pub title: String,
    /// Plain text with boilerplate elements removed.
    pub text: String,
    /// Number of words in `text`.
    pub word_count: usize,
}
