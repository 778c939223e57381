use std::sync::atomic::{AtomicBool, Ordering};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fyparchive_core::error::CoreError;

use crate::response::ApiResponse;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

static EXPOSE_INTERNAL_DETAIL: AtomicBool = AtomicBool::new(false);

/// Include internal error detail in 500 responses. Set once at startup from
/// `APP_ENV`; off by default.
pub fn set_expose_internal_detail(expose: bool) {
    EXPOSE_INTERNAL_DETAIL.store(expose, Ordering::Relaxed);
}

fn internal_detail(detail: impl Into<String>) -> Option<String> {
    EXPOSE_INTERNAL_DETAIL
        .load(Ordering::Relaxed)
        .then(|| detail.into())
}

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the standard envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fyparchive_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded a configured ceiling.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    RequestTimeout,

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, error) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => {
                    (StatusCode::NOT_FOUND, format!("{entity} not found"), None)
                }
                CoreError::FileNotFound(path) => {
                    tracing::warn!(path = %path, "Stored file missing");
                    (
                        StatusCode::NOT_FOUND,
                        "File not found on server".to_string(),
                        None,
                    )
                }
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    "Validation failed".to_string(),
                    Some(msg.clone()),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
                CoreError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, core.to_string(), None)
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_MESSAGE.to_string(),
                        internal_detail(msg.as_str()),
                    )
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone(), None),
            AppError::RequestTimeout => (StatusCode::REQUEST_TIMEOUT, self.to_string(), None),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_MESSAGE.to_string(),
                    internal_detail(msg.as_str()),
                )
            }
        };

        ApiResponse::failure(status, message, error).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, message, and optional detail.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String, Option<String>) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "Resource not found".to_string(),
            None,
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                        None,
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_MESSAGE.to_string(),
                internal_detail(db_err.to_string()),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_MESSAGE.to_string(),
                internal_detail(other.to_string()),
            )
        }
    }
}
