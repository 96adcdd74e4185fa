//! Error types for the mawrid application.

use crate::llm::LlmError;
use mawrid_search::SearchError;

/// Top-level error type for the search server.
#[derive(Debug, thiserror::Error)]
pub enum MawridError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Web search error.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Language model error.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// HTTP server error (bind, serve).
    #[error("server error: {0}")]
    Server(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, MawridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_display() {
        let err = MawridError::Config("port must be set".into());
        assert_eq!(err.to_string(), "config error: port must be set");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: MawridError = io.into();
        assert!(matches!(err, MawridError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn search_error_converts() {
        let err: MawridError = SearchError::Config("no providers".into()).into();
        assert_eq!(err.to_string(), "search error: config error: no providers");
    }

    #[test]
    fn llm_error_converts() {
        let err: MawridError = LlmError::NotConfigured.into();
        assert!(matches!(err, MawridError::Llm(_)));
        assert!(err.to_string().starts_with("LLM error"));
    }
}
