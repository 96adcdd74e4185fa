//! Route handlers. Provider and LLM failures degrade to fallback bodies;
//! only an empty query is a client error.

use std::collections::HashSet;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use mawrid_search::SearchResult;
use tracing::{debug, warn};

use super::AppState;
use super::types::{
    AnswerParams, ErrorResponse, HealthResponse, SearchParams, SearchResponse, SuggestionParams,
    SuggestionsResponse,
};
use crate::llm::{AiAnswer, LlmError, SUMMARY_FALLBACK};

/// Summary returned when the search pipeline fails.
pub(crate) const SEARCH_ERROR_SUMMARY: &str = "Search encountered an error. Please try again.";

pub(crate) async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_owned(),
        app_name: state.config.server.app_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

pub(crate) async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionParams>,
) -> impl IntoResponse {
    let limits = &state.config.suggestions;
    let limit = params
        .limit
        .map_or(limits.default_limit, |l| usize::try_from(l).unwrap_or(0))
        .min(limits.max_limit);
    Json(SuggestionsResponse {
        suggestions: state.suggestions.generate(&params.query, limit),
    })
}

pub(crate) async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let started = Instant::now();
    let query = params.query.trim();
    if query.is_empty() {
        return bad_request("query must not be empty");
    }
    tracing::trace!(query, "search request");
    state.stats.record_search(query);

    let ranked = match state.search.search(query).await {
        Ok(results) => results,
        Err(err) => {
            warn!(error = %err, "search failed");
            return Json(SearchResponse {
                query: query.to_owned(),
                results: Vec::new(),
                total_results: 0,
                processing_time: started.elapsed().as_secs_f64(),
                ai_summary: Some(SEARCH_ERROR_SUMMARY.to_owned()),
                suggestions: Vec::new(),
                timestamp: chrono::Utc::now(),
            })
            .into_response();
        }
    };
    state.stats.record_domains(&ranked);

    let total_results = ranked.len();
    let results: Vec<SearchResult> = ranked
        .into_iter()
        .skip(params.skip())
        .take(params.page_size())
        .collect();

    let ai_summary = summarize(&state, query, &results).await;
    let suggestions = related_queries(&state, query).await;

    debug!(
        total = total_results,
        returned = results.len(),
        "search completed"
    );

    Json(SearchResponse {
        query: query.to_owned(),
        results,
        total_results,
        processing_time: started.elapsed().as_secs_f64(),
        ai_summary,
        suggestions,
        timestamp: chrono::Utc::now(),
    })
    .into_response()
}

pub(crate) async fn answer(
    State(state): State<AppState>,
    Query(params): Query<AnswerParams>,
) -> Response {
    let query = params.query.trim();
    if query.is_empty() {
        return bad_request("query must not be empty");
    }
    tracing::trace!(query, "answer request");

    let results = state.search.search(query).await.unwrap_or_else(|err| {
        warn!(error = %err, "search for answer failed");
        Vec::new()
    });

    let answer = match state.llm.answer(query, &results).await {
        Ok(answer) => answer,
        Err(LlmError::NotConfigured) => AiAnswer::fallback(),
        Err(err) => {
            warn!(error = %err, "answer generation failed");
            AiAnswer::fallback()
        }
    };
    Json(answer).into_response()
}

pub(crate) async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.stats.snapshot(state.suggestions.cached_queries()))
}

/// LLM summary of `results`. `None` when there is nothing to summarise or
/// no LLM is configured; the fallback text when the LLM fails.
async fn summarize(state: &AppState, query: &str, results: &[SearchResult]) -> Option<String> {
    if results.is_empty() || !state.llm.is_configured() {
        return None;
    }
    match state.llm.summarize(query, results).await {
        Ok(summary) => Some(summary),
        Err(err) => {
            warn!(error = %err, "summary generation failed");
            Some(SUMMARY_FALLBACK.to_owned())
        }
    }
}

/// Local suggestions, followed by LLM ones when augmentation is on.
async fn related_queries(state: &AppState, query: &str) -> Vec<String> {
    let limits = &state.config.suggestions;
    let mut suggestions = state.suggestions.generate(query, limits.default_limit);
    if !state.llm.augments_suggestions() {
        return suggestions;
    }

    match state.llm.suggest(query).await {
        Ok(extra) => {
            let lowered_query = query.to_lowercase();
            let mut seen: HashSet<String> = suggestions.iter().map(|s| s.to_lowercase()).collect();
            for suggestion in extra {
                let lowered = suggestion.to_lowercase();
                if lowered != lowered_query && seen.insert(lowered) {
                    suggestions.push(suggestion);
                }
            }
            suggestions.truncate(limits.max_limit);
        }
        Err(err) => warn!(error = %err, "LLM suggestions failed"),
    }
    suggestions
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_owned(),
        }),
    )
        .into_response()
}
