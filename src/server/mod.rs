//! Axum HTTP server: the JSON API the browser UI talks to.
//!
//! ## URL layout
//!
//! ```text
//! GET  /api/health     — liveness + active provider
//! POST /api/detect     — { prompt } → { language }
//! POST /api/generate   — { prompt } → { code, language } | { error }
//! ```
//!
//! `run()` drives the axum event loop until the [`CancellationToken`] is
//! cancelled, then shuts down gracefully.

mod api;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::core::error::AppError;
use crate::llm::LlmProvider;

// ── Shared request state ──────────────────────────────────────────────────────

/// Router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone; the provider is reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the configured provider needs an API key and none is set;
    /// `/api/generate` then answers 500 without contacting anyone.
    provider: Option<Arc<LlmProvider>>,
    /// Deadline for one generate request, upstream polling included.
    request_timeout: Duration,
}

impl AppState {
    pub fn new(provider: Option<LlmProvider>, request_timeout: Duration) -> Self {
        Self { provider: provider.map(Arc::new), request_timeout }
    }
}

// ── Server ────────────────────────────────────────────────────────────────────

pub struct Server {
    bind_addr: String,
    state: AppState,
}

impl Server {
    pub fn new(bind_addr: impl Into<String>, state: AppState) -> Self {
        Self { bind_addr: bind_addr.into(), state }
    }

    /// Bind, serve, and return once `shutdown` fires and in-flight requests
    /// have drained.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), AppError> {
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .map_err(|e| AppError::Server(format!("bind failed on {}: {e}", self.bind_addr)))?;

        let local = listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| self.bind_addr.clone());
        info!(bind_addr = %local, "http server listening");

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;

        info!("http server shut down");
        Ok(())
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health",   get(api::health))
        .route("/api/detect",   post(api::detect))
        .route("/api/generate", post(api::generate))
        .with_state(state)
}
