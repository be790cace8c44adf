//! Path extractor for integer ids.

use crate::errors::{ErrorCode, error_response};
use axum::{
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

/// Extracts the id path segment as an `i64`.
///
/// A non-numeric segment answers 400 with the offending value named, instead
/// of the opaque 500 a failed `Path<i64>` rejection would produce.
///
/// # Example
/// ```ignore
/// use axum::{Router, routing::get};
/// use axum_helpers::extractors::IdPath;
///
/// async fn product(IdPath(id): IdPath) -> String {
///     format!("product {}", id)
/// }
///
/// let app: Router = Router::new().route("/products/{id}", get(product));
/// ```
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Take the segment as a string first so the error can echo it back
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        raw.parse::<i64>().map(IdPath).map_err(|_| {
            error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid numeric id: {}", raw),
                ErrorCode::InvalidId,
            )
        })
    }
}
