//! Query-focused snippet extraction.
//!
//! Picks the fixed-size window of a document with the most distinct query
//! terms and returns it with a little leading context. All offsets count
//! chars, not bytes, so multi-byte text is never split mid-character.

/// Documents at or below this many chars are returned unchanged.
pub const MAX_UNWINDOWED_CHARS: usize = 300;

/// Width of the scoring window in chars.
pub const WINDOW_CHARS: usize = 200;

/// Distance between consecutive window starts.
pub const WINDOW_STRIDE: usize = 50;

/// Chars of context kept before the winning window.
pub const LEADING_CONTEXT_CHARS: usize = 50;

/// Query terms of this many chars or fewer are ignored.
pub const MIN_TERM_CHARS: usize = 2;

const ELLIPSIS: &str = "...";

/// Extract the most query-dense excerpt of `content`.
///
/// Windows are compared by how many distinct query terms (longer than
/// [`MIN_TERM_CHARS`]) they contain as substrings, case-insensitively. The
/// earliest window wins ties, so a query with no usable terms always gets the
/// opening of the document.
///
/// The result holds at most `LEADING_CONTEXT_CHARS + WINDOW_CHARS` chars of
/// content plus an ellipsis marker on each truncated side.
///
/// # Examples
///
/// ```
/// use mawrid_search::snippet::extract_snippet;
///
/// assert_eq!(extract_snippet("short text", "anything"), "short text");
/// ```
pub fn extract_snippet(content: &str, query: &str) -> String {
    // Byte offset of every char, plus the end of the string.
    let bounds: Vec<usize> = content
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(content.len()))
        .collect();
    let len = bounds.len() - 1;

    if len <= MAX_UNWINDOWED_CHARS {
        return content.to_owned();
    }

    let terms = query_terms(query);
    let slice = |from: usize, to: usize| &content[bounds[from]..bounds[to]];

    let mut best_start = 0;
    let mut best_matches = 0;
    let mut start = 0;
    while start + WINDOW_CHARS < len {
        let window = slice(start, start + WINDOW_CHARS).to_lowercase();
        let matches = terms.iter().filter(|t| window.contains(t.as_str())).count();
        if matches > best_matches {
            best_matches = matches;
            best_start = start;
        }
        start += WINDOW_STRIDE;
    }

    let from = best_start.saturating_sub(LEADING_CONTEXT_CHARS);
    let to = (best_start + WINDOW_CHARS).min(len);

    let mut snippet = String::with_capacity(bounds[to] - bounds[from] + 2 * ELLIPSIS.len());
    if from > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(slice(from, to));
    if to < len {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

/// Distinct lowercase whitespace-delimited terms longer than [`MIN_TERM_CHARS`].
fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in query.to_lowercase().split_whitespace() {
        if term.chars().count() > MIN_TERM_CHARS && !terms.iter().any(|t| t == term) {
            terms.push(term.to_owned());
        }
    }
    terms
}
