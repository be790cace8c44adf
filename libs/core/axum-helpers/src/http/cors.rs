use axum::http::{HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS layer restricted to an explicit origin allow-list.
///
/// Beyond the origins, the layer permits the usual REST verbs plus OPTIONS,
/// the Content-Type / Authorization / Accept headers, and credentials, with
/// preflight results cached for an hour.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Wide-open CORS for local development only; any origin is accepted.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
