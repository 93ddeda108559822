use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use actlog_core::ServiceError;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not_found: {0}")]
    NotFound(&'static str),
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    #[error("validation_error: {detail}")]
    Validation { status: StatusCode, detail: String },
    #[error("db_error")]
    Store(#[from] ServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation { status, .. } => *status,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::Validation { .. } => "validation_error",
            Self::Store(_) => "db_error",
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::NotFound(detail) | Self::Unauthorized(detail) | Self::Forbidden(detail) => {
                (*detail).to_string()
            }
            Self::Validation { detail, .. } => detail.clone(),
            // Store failures are logged where they happen; callers only see a generic message.
            Self::Store(_) => "Internal server error".to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.code().to_string(),
            detail: self.detail(),
        };
        (self.status(), Json(body)).into_response()
    }
}
