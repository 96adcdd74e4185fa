//! Per-result post-processing: query-focused snippets and bounded content.

use crate::snippet::extract_snippet;
use crate::types::{domain_of, SearchResult};

/// Maximum chars of document body kept in [`SearchResult::content`].
pub const MAX_CONTENT_CHARS: usize = 500;

/// Rewrite `result` for display.
///
/// The document is the fetched page text when there is one, else the
/// provider's raw content, else the provider snippet. The snippet becomes
/// the most query-dense excerpt of that document and `content` keeps its
/// first [`MAX_CONTENT_CHARS`] chars.
pub fn postprocess(mut result: SearchResult, query: &str, page_text: Option<String>) -> SearchResult {
    let document = page_text
        .filter(|text| !text.trim().is_empty())
        .or_else(|| result.content.take().filter(|c| !c.trim().is_empty()));

    match document {
        Some(document) => {
            result.snippet = extract_snippet(&document, query);
            result.content = Some(truncate_chars(&document, MAX_CONTENT_CHARS));
        }
        None => {
            result.snippet = extract_snippet(&result.snippet, query);
            result.content = None;
        }
    }

    if result.domain.is_empty() {
        result.domain = domain_of(&result.url);
    }
    result
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_owned(),
        None => text.to_owned(),
    }
}
