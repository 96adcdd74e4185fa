//! Mawrid: AI-assisted meta search server.
//!
//! Wraps the [`mawrid_search`] core in a JSON HTTP API:
//! Query → providers → merge/rank → snippets → summary + suggestions
//!
//! # Architecture
//!
//! - **Search**: concurrent Serper, Brave and Tavily queries with ranking and
//!   a TTL result cache (`mawrid-search`)
//! - **Suggestions**: pattern-based autocomplete with a bounded memo cache,
//!   optionally augmented by the LLM
//! - **LLM**: summaries and direct answers from any OpenAI-compatible
//!   chat completion endpoint
//! - **Server**: axum router on a background tokio task

pub mod config;
pub mod error;
pub mod llm;
pub mod server;

pub use config::MawridConfig;
pub use error::{MawridError, Result};
pub use llm::{AiAnswer, LlmClient, LlmError};
pub use server::{AppState, MawridServer, SearchResponse, SearchStats};
