//! HTTP API
//!
//! - `POST /api/chat` fans a conversation out to every configured provider
//! - `GET /api/models` lists the model catalog
//! - `GET /health` reports liveness and the configured providers

mod error;
mod handlers;

pub use error::ApiError;

use axum::{
    Router,
    routing::{get, post},
};
use fiesta_application::CompareProvidersUseCase;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    pub use_case: Arc<CompareProvidersUseCase>,
}

impl AppState {
    pub fn new(use_case: CompareProvidersUseCase) -> Self {
        Self {
            use_case: Arc::new(use_case),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(handlers::chat))
        .route("/api/models", get(handlers::models))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serve the API until the task is cancelled or the listener fails.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(state)).await
}
