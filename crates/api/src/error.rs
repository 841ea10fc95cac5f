use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pawtrail_core::error::CoreError;
use pawtrail_db::DbError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `pawtrail_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(core) => AppError::Core(core),
            DbError::Sqlx(sqlx) => AppError::Database(sqlx),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND".to_string(),
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation { .. } => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR".to_string(),
                    core.to_string(),
                ),
                CoreError::PostNotActive { .. } => (
                    StatusCode::BAD_REQUEST,
                    "POST_NOT_ACTIVE".to_string(),
                    core.to_string(),
                ),
                CoreError::InsufficientBalance { .. } => (
                    StatusCode::BAD_REQUEST,
                    "INSUFFICIENT_BALANCE".to_string(),
                    core.to_string(),
                ),
                CoreError::AlreadySettled => (
                    StatusCode::CONFLICT,
                    "ALREADY_SETTLED".to_string(),
                    core.to_string(),
                ),
                CoreError::Inconsistency(detail) => {
                    tracing::error!(error = %detail, "Internal consistency error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INCONSISTENCY".to_string(),
                        "An internal error occurred".to_string(),
                    )
                }
                CoreError::SettlementFailed { step } => {
                    tracing::error!(step = %step, "Settlement failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("SETTLEMENT_FAILED_{}", step.as_str().to_uppercase()),
                        "Reward settlement failed".to_string(),
                    )
                }
                CoreError::Conflict(msg) => {
                    (StatusCode::CONFLICT, "CONFLICT".to_string(), msg.clone())
                }
                CoreError::Unauthorized(msg) => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED".to_string(),
                    msg.clone(),
                ),
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN".to_string(), msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR".to_string(),
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST".to_string(),
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR".to_string(),
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND".to_string(),
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT".to_string(),
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR".to_string(),
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR".to_string(),
                "An internal error occurred".to_string(),
            )
        }
    }
}
