use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use showroom_core::error::CoreError;

/// Error returned by every handler.
///
/// Rendered as `{ "success": false, "error": <message>, "code": <CODE> }`.
/// Server-side failures are logged here and reach the client only as a
/// generic message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A JSON body that could not be read or deserialized.
    #[error("Invalid JSON body: {0}")]
    Json(#[from] JsonRejection),

    /// Malformed request framing (e.g. a broken multipart body).
    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    code: &'static str,
}

type Classified = (StatusCode, &'static str, String);

fn internal() -> Classified {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl AppError {
    /// Status, machine-readable code, and client-facing message.
    fn classify(&self) -> Classified {
        match self {
            AppError::Core(core) => classify_core(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Json(rejection) => (rejection.status(), "INVALID_JSON", rejection.body_text()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.classify();
        let body = ErrorBody {
            success: false,
            error,
            code,
        };
        (status, Json(body)).into_response()
    }
}

fn classify_core(err: &CoreError) -> Classified {
    match err {
        CoreError::NotFound { .. } | CoreError::NotFoundBySlug { .. } => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
        }
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Storage(msg) => {
            tracing::error!(error = %msg, "Media storage failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "Failed to store uploaded file".to_string(),
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal error");
            internal()
        }
    }
}

/// Map sqlx failures: `RowNotFound` is 404, a Postgres unique violation
/// (23505) on a `uq_*` constraint is 409, anything else a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        );
    }

    let unique_violation = err
        .as_database_error()
        .filter(|db| db.code().as_deref() == Some("23505"))
        .and_then(|db| db.constraint())
        .filter(|constraint| constraint.starts_with("uq_"));
    if let Some(constraint) = unique_violation {
        return (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        );
    }

    tracing::error!(error = %err, "Database error");
    internal()
}
