//! JSON HTTP API over the search pipeline, suggestion engine and LLM.
//!
//! ## Endpoints
//!
//! - `GET /health` — liveness and version
//! - `GET /api/suggestions` — local autocomplete
//! - `GET`/`POST /api/search` — ranked results with summary and suggestions
//! - `GET`/`POST /api/answer` — direct answer grounded in search results
//! - `GET /api/stats` — volatile request statistics

mod handlers;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use mawrid_search::{SearchClient, SuggestionEngine};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::{MawridConfig, ServerConfig};
use crate::error::{MawridError, Result};
use crate::llm::LlmClient;
use types::StatsTracker;

pub use types::{SearchResponse, SearchStats};

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) config: Arc<MawridConfig>,
    pub(crate) search: SearchClient,
    pub(crate) suggestions: Arc<SuggestionEngine>,
    pub(crate) llm: LlmClient,
    pub(crate) stats: Arc<StatsTracker>,
}

impl AppState {
    /// Build the search client, suggestion engine and LLM client from
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the search config is invalid or an HTTP client
    /// cannot be built.
    pub fn new(config: MawridConfig) -> Result<Self> {
        let search = SearchClient::new(config.search.clone())?;
        let suggestions = Arc::new(SuggestionEngine::with_capacity(
            config.suggestions.cache_capacity,
        ));
        let llm = LlmClient::new(config.llm.clone())?;
        if !llm.is_configured() {
            info!("LLM not configured; summaries and answers use fallbacks");
        }
        Ok(Self {
            config: Arc::new(config),
            search,
            suggestions,
            llm,
            stats: Arc::new(StatsTracker::default()),
        })
    }

    /// The configuration this state was built from.
    pub fn config(&self) -> &MawridConfig {
        &self.config
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/suggestions", get(handlers::suggestions))
        .route("/api/search", get(handlers::search).post(handlers::search))
        .route("/api/answer", get(handlers::answer).post(handlers::answer))
        .route("/api/stats", get(handlers::stats))
        .with_state(state)
}

/// Running HTTP server. Dropping it stops the listener.
pub struct MawridServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MawridServer {
    /// Start serving the API.
    ///
    /// Binds to `{config.host}:{config.port}` (use port `0` for auto-assign)
    /// and serves in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns [`MawridError::Server`] if the listener cannot bind.
    pub async fn start(state: AppState, config: &ServerConfig) -> Result<Self> {
        let app = router(state);

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| MawridError::Server(format!("bind to {bind_addr} failed: {e}")))?;

        let addr = listener
            .local_addr()
            .map_err(|e| MawridError::Server(format!("failed to get local addr: {e}")))?;

        info!("{} listening on http://{addr}", config.app_name);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for MawridServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn local_config() -> ServerConfig {
        ServerConfig {
            port: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn binds_ephemeral_port() {
        let state = AppState::new(MawridConfig::default()).unwrap();
        let server = MawridServer::start(state, &local_config()).await.unwrap();
        assert_ne!(server.port(), 0);
        assert!(server.addr().ip().is_loopback());
        server.shutdown();
    }

    #[tokio::test]
    async fn bind_conflict_is_server_error() {
        let state = AppState::new(MawridConfig::default()).unwrap();
        let first = MawridServer::start(state.clone(), &local_config())
            .await
            .unwrap();
        let taken = ServerConfig {
            port: first.port(),
            ..Default::default()
        };
        let err = MawridServer::start(state, &taken).await.err().unwrap();
        assert!(matches!(err, MawridError::Server(_)));
    }

    #[test]
    fn invalid_search_config_rejected() {
        let mut config = MawridConfig::default();
        config.search.max_results = 0;
        assert!(matches!(AppState::new(config), Err(MawridError::Search(_))));
    }
}
