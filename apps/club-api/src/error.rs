//! Error types for the Club API.
//!
//! Every failure a handler can return ends up as an [`ApiError`]: a status
//! code plus a `{"code", "message"}` JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cue_core::ErrorKind;
use cue_db::DbError;
use serde::Serialize;

/// Club API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Response body for every error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Unauthorized(msg)
            | ApiError::InvalidRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => msg.clone(),
            // Storage details stay in the log.
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(error: DbError) -> Self {
        match error.kind() {
            Some(ErrorKind::Conflict) => ApiError::Conflict(error.to_string()),
            Some(ErrorKind::NotFound) => ApiError::NotFound(error.to_string()),
            Some(ErrorKind::Validation) => ApiError::InvalidRequest(error.to_string()),
            None => {
                tracing::error!(error = %error, "Database error");
                ApiError::Internal(error.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use cue_core::{CoreError, ValidationError};

    #[test]
    fn test_domain_errors_map_to_status() {
        let occupied: ApiError = DbError::from(CoreError::TableOccupied { table_number: 2 }).into();
        assert_eq!(occupied.status(), StatusCode::CONFLICT);

        let missing: ApiError = DbError::from(CoreError::SessionNotActive("s-1".into())).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let invalid: ApiError = DbError::from(ValidationError::Required {
            field: "customer_name".into(),
        })
        .into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_errors_are_internal() {
        let err: ApiError = DbError::PoolExhausted.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_duplicates_are_conflicts() {
        let err: ApiError = DbError::duplicate("item_name", "Cola").into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "conflict");
    }
}
