pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// Clients branch on `error`, dashboards aggregate on `code`, humans read
/// `message`. `details` carries structured payloads such as per-field
/// validation errors and is omitted from the JSON when empty.
///
/// ```json
/// {
///   "code": 1008,
///   "error": "CONFLICT",
///   "message": "Resource already exists"
/// }
/// ```
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Numeric code, stable across releases
    pub code: i32,
    /// Machine-readable identifier such as "CONFLICT"
    pub error: String,
    /// Human-readable explanation
    pub message: String,
    /// Structured extras, e.g. field-level validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Errors a handler can bubble up with `?`.
///
/// Infrastructure failures convert via `#[from]`; the string variants carry
/// messages written for the client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Database(e) => map_db_error(&e),
            AppError::Io(e) => {
                tracing::error!(error_code = ErrorCode::IoError.code(), "I/O error: {:?}", e);
                respond(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::IoError,
                    ErrorCode::IoError.default_message().to_string(),
                    None,
                )
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                respond(e.status(), ErrorCode::JsonExtraction, e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                let details = serde_json::to_value(&e).unwrap_or(serde_json::json!(null));
                respond(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError,
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(details),
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!(
                    error_code = ErrorCode::BadRequest.code(),
                    "Bad request: {}",
                    msg
                );
                respond(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg, None)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                respond(StatusCode::NOT_FOUND, ErrorCode::NotFound, msg, None)
            }
            AppError::Conflict(msg) => {
                tracing::info!(error_code = ErrorCode::Conflict.code(), "Conflict: {}", msg);
                respond(StatusCode::CONFLICT, ErrorCode::Conflict, msg, None)
            }
        }
    }
}

/// Translates a [`DbErr`] into the response the client should see.
///
/// Constraint violations surface as 409s so callers that lost a write race
/// against a unique index still report a conflict rather than a 500.
fn map_db_error(error: &DbErr) -> Response {
    if let Some(
        SqlErr::UniqueConstraintViolation(violation)
        | SqlErr::ForeignKeyConstraintViolation(violation),
    ) = error.sql_err()
    {
        tracing::info!(
            error_code = ErrorCode::DatabaseConflict.code(),
            "Constraint violation: {}",
            violation
        );
        return respond(
            StatusCode::CONFLICT,
            ErrorCode::DatabaseConflict,
            ErrorCode::DatabaseConflict.default_message().to_string(),
            None,
        );
    }

    match error {
        DbErr::RecordNotFound(what) => {
            tracing::info!(
                error_code = ErrorCode::DatabaseNotFound.code(),
                "Database record not found: {}",
                what
            );
            respond(
                StatusCode::NOT_FOUND,
                ErrorCode::DatabaseNotFound,
                ErrorCode::DatabaseNotFound.default_message().to_string(),
                None,
            )
        }
        DbErr::ConnectionAcquire(cause) => {
            tracing::error!(
                error_code = ErrorCode::DatabaseUnavailable.code(),
                "Database connection acquire error: {:?}",
                cause
            );
            respond(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::DatabaseUnavailable,
                ErrorCode::DatabaseUnavailable.default_message().to_string(),
                None,
            )
        }
        other => {
            tracing::error!(
                error_code = ErrorCode::DatabaseError.code(),
                "Database error: {:?}",
                other
            );
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                ErrorCode::DatabaseError.default_message().to_string(),
                None,
            )
        }
    }
}

fn respond(
    status: StatusCode,
    code: ErrorCode,
    message: String,
    details: Option<serde_json::Value>,
) -> Response {
    let body = ErrorResponse {
        code: code.code(),
        error: code.as_str().to_string(),
        message,
        details,
    };
    (status, Json(body)).into_response()
}

/// Builds an error [`Response`] outside the [`AppError`] conversion path.
///
/// Extractors use this when they must answer before a handler ever runs.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    respond(status, error_code, message, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use sea_orm::ConnAcquireErr;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn conflict_carries_the_caller_message() {
        let response =
            AppError::Conflict("Category with name Garden already exists!".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["code"], 1008);
        assert_eq!(body["error"], "CONFLICT");
        assert_eq!(body["message"], "Category with name Garden already exists!");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn record_not_found_maps_to_404() {
        let response =
            AppError::Database(DbErr::RecordNotFound("category 41".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_NOT_FOUND");
    }

    #[tokio::test]
    async fn pool_exhaustion_maps_to_503() {
        let response = AppError::Database(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout))
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert_eq!(body["code"], 2004);
    }

    #[tokio::test]
    async fn unclassified_database_errors_stay_500() {
        let response =
            AppError::Database(DbErr::Custom("connection reset".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
    }

    #[tokio::test]
    async fn validation_failures_include_field_details() {
        #[derive(Validate)]
        struct NamePayload {
            #[validate(length(min = 5))]
            name: String,
        }

        let errors = NamePayload {
            name: "ab".to_string(),
        }
        .validate()
        .unwrap_err();

        let response = AppError::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Request validation failed");
        assert!(body["details"]["name"].is_array());
    }
}
