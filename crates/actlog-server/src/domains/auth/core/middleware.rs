use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use actlog_core::{Identity, ServiceError};

use crate::app::AppState;
use crate::domains::auth::core::identity::identity_from_session_token;
use crate::domains::errors::ApiError;
use crate::infra::metrics;
use crate::infra::request_context::user_agent;

const CREDENTIALS_REJECTED: &str = "Could not validate credentials";

pub async fn auth_middleware(mut request: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let state = request
        .extensions()
        .get::<AppState>()
        .cloned()
        .ok_or_else(|| ApiError::from(ServiceError::new("internal", "app state missing")))?;
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::Unauthorized("Not authenticated"))?;

    let identity = match identity_from_session_token(&state, token).await {
        Ok(identity) => identity,
        Err("db_error") => {
            return Err(ServiceError::new("db_error", "session lookup failed").into());
        }
        Err(reason) => {
            tracing::warn!(
                event = "auth_failed",
                reason,
                user_agent = ?user_agent(request.headers()),
                "Session token rejected"
            );
            return Err(ApiError::Unauthorized(CREDENTIALS_REJECTED));
        }
    };

    tracing::Span::current().record("user_id", identity.user_id.as_str());
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Must run inside [`auth_middleware`].
pub async fn require_super_admin(request: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let identity = request
        .extensions()
        .get::<Identity>()
        .ok_or(ApiError::Unauthorized("Not authenticated"))?;
    if !identity.is_super_admin {
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map_or("unmatched", MatchedPath::as_str);
        tracing::warn!(
            event = "forbidden",
            user_id = %identity.user_id,
            route,
            "Super-admin required"
        );
        metrics::forbidden_access(route);
        return Err(ApiError::Forbidden(
            "You do not have permission to access this resource",
        ));
    }
    Ok(next.run(request).await)
}
