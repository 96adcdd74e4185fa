//! HTML content extraction: strips boilerplate and returns readable text.
//!
//! Walks the parsed document, skipping non-content subtrees (scripts,
//! styles, navigation), and returns the text of the main content area with
//! whitespace collapsed. The result feeds the snippet extractor.

use scraper::{ElementRef, Html, Node, Selector};

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::http;
use crate::types::PageContent;

/// Default maximum characters kept from extracted content.
pub const DEFAULT_MAX_CHARS: usize = 100_000;

/// Elements whose whole subtree is ignored.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "noscript", "svg", "iframe",
];

/// Content containers, in priority order.
const CONTENT_SELECTORS: &[&str] = &["article", "main", "[role=\"main\"]", "body"];

/// Extract readable text content from raw HTML.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if no extractable content is found.
pub fn extract_content(html: &str, url: &str) -> Result<PageContent> {
    extract_content_with_limit(html, url, DEFAULT_MAX_CHARS)
}

/// Same as [`extract_content`] with a custom limit on the text length in
/// chars.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if no extractable content is found.
pub fn extract_content_with_limit(html: &str, url: &str, max_chars: usize) -> Result<PageContent> {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let text = extract_main_text(&document);
    if text.is_empty() {
        return Err(SearchError::Parse("no extractable content found".into()));
    }

    let text: String = match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].trim_end().to_owned(),
        None => text,
    };
    let word_count = text.split_whitespace().count();

    Ok(PageContent {
        url: url.to_owned(),
        title,
        text,
        word_count,
    })
}

/// Download `url` and extract its readable text.
///
/// # Errors
///
/// Returns [`SearchError::Http`] or [`SearchError::Timeout`] when the
/// download fails, and [`SearchError::Parse`] when the response is not HTML
/// or holds no text.
pub async fn fetch_page_content(url: &str, config: &SearchConfig) -> Result<PageContent> {
    tracing::trace!(url, "fetching page");

    let client = http::build_client(config)?;
    let response = client
        .get(url)
        .header("Accept", "text/html,application/xhtml+xml")
        .send()
        .await
        .map_err(|e| SearchError::from_transport("page fetch", &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::from_status("page fetch", status));
    }

    let is_html = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(true, |ct| ct.contains("html"));
    if !is_html {
        return Err(SearchError::Parse(format!("{url} is not an HTML page")));
    }

    let html = response
        .text()
        .await
        .map_err(|e| SearchError::from_transport("page fetch", &e))?;
    extract_content(&html, url)
}

fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default()
}

/// Text of the first content container that has any.
fn extract_main_text(document: &Html) -> String {
    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(container) = document.select(&selector).next() {
            let text = container_text(container);
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

/// Collapsed text of every text node under `container` that is not inside a
/// skipped element.
fn container_text(container: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in container.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let skipped = node
            .ancestors()
            .take_while(|a| a.id() != container.id())
            .filter_map(|a| a.value().as_element())
            .any(|el| SKIPPED_TAGS.contains(&el.name()));
        if !skipped {
            raw.push_str(text);
            raw.push(' ');
        }
    }
    collapse_whitespace(&raw)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
