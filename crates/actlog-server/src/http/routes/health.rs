use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use schemars::JsonSchema;
use serde::Serialize;

use crate::app::AppState;

#[derive(Serialize, JsonSchema)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) version: &'static str,
    pub(crate) uptime_seconds: u64,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(err) => {
            tracing::warn!(event = "health_db_failed", error = %err);
            (StatusCode::SERVICE_UNAVAILABLE, "db_error")
        }
    };
    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds: state.started_at.elapsed().as_secs(),
        }),
    )
}
