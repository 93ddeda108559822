use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use actlog_core::{ActivityLog, Identity};

use crate::app::AppState;
use crate::domains::activity_logs::service::{ActivityLogService, CreateActivityLogCommand};
use crate::domains::errors::ApiError;
use crate::infra::metrics;

use super::types::{ActivityLogListResponse, CreateActivityLogRequest, CreateActivityLogResponse};

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn create_activity_log(
    State(state): State<AppState>,
    payload: Result<Json<CreateActivityLogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let service = ActivityLogService::new(state.store.as_ref());
    if !service.user_exists(&payload.user_id).await? {
        tracing::info!(
            event = "activity_log_user_missing",
            user_id = %payload.user_id
        );
        return Err(ApiError::NotFound("User not found"));
    }

    let log = service
        .create(CreateActivityLogCommand {
            user_id: payload.user_id,
            action_type: payload.action_type,
            description: payload.description,
        })
        .await
        .map_err(|err| {
            if err.kind == "not_found" {
                ApiError::NotFound("User not found")
            } else {
                ApiError::from(err)
            }
        })?;
    metrics::activity_log_created();
    tracing::info!(
        event = "activity_log_created",
        log_id = %log.id,
        user_id = %log.user_id,
        action_type = %log.action_type
    );
    Ok((
        StatusCode::CREATED,
        Json(CreateActivityLogResponse::from_log(&log)),
    ))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn list_user_activity_logs(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ActivityLogListResponse>, ApiError> {
    let service = ActivityLogService::new(state.store.as_ref());
    if !service.user_exists(&user_id).await? {
        return Err(ApiError::NotFound("Not Found: User ID does not exist"));
    }
    let logs = service.logs_for_user(&user_id).await?;
    tracing::info!(
        event = "activity_logs_listed",
        user_id = %user_id,
        count = logs.len()
    );
    Ok(Json(ActivityLogListResponse::new(logs)))
}

#[tracing::instrument(skip(state, identity))]
pub(crate) async fn list_activity_logs(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    // require_super_admin already rejected these callers with 403.
    if !identity.is_super_admin {
        return Err(ApiError::Unauthorized("You cannot access these."));
    }
    let logs = ActivityLogService::new(state.store.as_ref())
        .all_logs()
        .await?;
    tracing::info!(event = "activity_logs_listed", count = logs.len());
    Ok(Json(logs))
}
