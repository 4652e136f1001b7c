// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{
    import::ValidationError,
    session::{SessionError, StoreError},
};

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    // 400 Bad Request: rejected import payload or request body
    #[error("{0}")]
    Validation(String),

    // 400 Bad Request: contract violation from the presentation layer
    #[error("{0}")]
    InvalidInput(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 409 Conflict (e.g., answering a finished session)
    #[error("{0}")]
    Conflict(String),

    // 500 Internal Server Error: catalog or session storage failed
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Storage(msg) => {
                tracing::error!("Storage failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::Storage`.
/// Allows using `?` operator on catalog queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::QuestionOutOfRange { .. } | SessionError::OptionOutOfRange(_) => {
                AppError::InvalidInput(err.to_string())
            }
            SessionError::Completed | SessionError::NotCompleted => {
                AppError::Conflict(err.to_string())
            }
            SessionError::EmptyExam => AppError::Validation(err.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}
