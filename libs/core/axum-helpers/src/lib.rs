//! Building blocks for the Axum HTTP apps in this workspace.
//!
//! - [`server`]: router assembly, OpenAPI UIs, readiness checks, graceful
//!   shutdown
//! - [`http`]: CORS and security-header middleware
//! - [`errors`]: the error response contract ([`AppError`], [`ErrorCode`])
//! - [`extractors`]: [`IdPath`] and [`ValidatedJson`] request extractors
//! - [`pagination`]: page descriptors and the page envelope for list
//!   endpoints
//!
//! A minimal app wires together like this:
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new();
//!     let router = create_router::<ApiDoc>(api_routes).await?;
//!     create_app(router, &ServerConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod pagination;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{create_cors_layer, create_permissive_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{IdPath, ValidatedJson};

pub use pagination::{Page, PageQuery, PageRequest, SortOrder};
