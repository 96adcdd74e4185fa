//! Search orchestrator: concurrent queries, scoring, dedup, ranking and
//! post-processing.
//!
//! This module fans out queries to every configured provider, scores each
//! result, deduplicates by normalised URL with a multi-provider boost, and
//! returns a sorted, truncated result set with query-focused snippets.

pub mod dedup;
pub mod postprocess;
pub mod scoring;
pub mod search;
pub mod url_normalize;
