use aide::axum::{
    routing::{get, post},
    ApiRouter,
};
use aide::openapi::{Info, OpenApi};
use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;

use actlog_core::ActivityLog;

use crate::app::AppState;
use crate::domains::activity_logs::http::v1::types::{
    ActivityLogListResponse, CreateActivityLogRequest, CreateActivityLogResponse,
    CREATED_MESSAGE,
};
use crate::http::routes::health::HealthResponse;

pub fn build_openapi() -> OpenApi {
    let mut api = OpenApi {
        info: Info {
            title: "actlog-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    let _ = doc_router().finish_api(&mut api);
    api
}

fn doc_router() -> ApiRouter<AppState> {
    ApiRouter::new()
        .api_route("/health", get(health))
        .api_route("/activity-logs/create", post(activity_logs_create))
        .api_route("/activity-logs", get(activity_logs_list))
        .api_route("/activity-logs/:user_id", get(activity_logs_for_user))
}

// Document-only stubs; the served handlers live in the domain routers.
fn not_implemented<T>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::NOT_IMPLEMENTED, Json(body))
}

async fn health() -> (StatusCode, Json<HealthResponse>) {
    not_implemented(HealthResponse {
        status: "not_implemented",
        version: "0.0.0",
        uptime_seconds: 0,
    })
}

async fn activity_logs_create(
    Json(_payload): Json<CreateActivityLogRequest>,
) -> (StatusCode, Json<CreateActivityLogResponse>) {
    not_implemented(CreateActivityLogResponse {
        id: String::new(),
        message: CREATED_MESSAGE,
        status_code: 201,
        timestamp: Default::default(),
    })
}

async fn activity_logs_list() -> (StatusCode, Json<Vec<ActivityLog>>) {
    not_implemented(Vec::new())
}

async fn activity_logs_for_user(
    Path(_user_id): Path<String>,
) -> (StatusCode, Json<ActivityLogListResponse>) {
    not_implemented(ActivityLogListResponse::new(Vec::new()))
}
