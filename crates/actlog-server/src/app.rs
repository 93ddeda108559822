use axum::{extract::DefaultBodyLimit, Extension, Router};
use std::sync::Arc;
use std::time::Instant;

use actlog_core::Store;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub started_at: Instant,
    pub token_pepper: String,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, token_pepper: impl Into<String>, config: ServerConfig) -> Self {
        Self {
            store,
            started_at: Instant::now(),
            token_pepper: token_pepper.into(),
            config,
        }
    }
}

/// Routes plus the state extension the auth middleware reads.
pub fn build_router(state: AppState) -> Router {
    let extension_state = state.clone();
    let max_body_bytes = state.config.server.max_body_bytes;
    crate::http::router()
        .with_state(state)
        .layer(Extension(extension_state))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}
