//! JSON body extractor that validates before the handler runs.

use crate::errors::{AppError, ErrorCode, ErrorResponse};
use axum::{
    extract::{FromRequest, Json, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Deserialize the JSON body and run the payload's `Validate` rules.
///
/// Handlers that take `ValidatedJson<T>` only ever see payloads that passed
/// validation; malformed JSON and rule violations are answered with a 400
/// carrying per-field details before the handler is entered.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// #[serde(rename_all = "camelCase")]
/// struct CreateCategory {
///     #[validate(length(min = 5))]
///     category_name: String,
/// }
///
/// async fn create_category(ValidatedJson(input): ValidatedJson<CreateCategory>) {
///     // input.category_name is at least 5 characters here
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        match payload.validate() {
            Ok(()) => Ok(ValidatedJson(payload)),
            Err(errors) => {
                let body = ErrorResponse {
                    code: ErrorCode::ValidationError.code(),
                    error: ErrorCode::ValidationError.as_str().to_string(),
                    message: ErrorCode::ValidationError.default_message().to_string(),
                    details: Some(validation_details(&errors)),
                };
                Err((StatusCode::BAD_REQUEST, axum::Json(body)).into_response())
            }
        }
    }
}

/// Flatten `ValidationErrors` into `{ field: [{code, message, params}] }`.
fn validation_details(errors: &validator::ValidationErrors) -> serde_json::Value {
    let fields = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let entries: Vec<serde_json::Value> = errors
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "code": e.code,
                        "message": e.message,
                        "params": e.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::json!(entries))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(fields)
}
