use super::shutdown::{ShutdownCoordinator, coordinated_shutdown, shutdown_signal};
use crate::errors::handlers::not_found;
use crate::http::cors::{create_cors_layer, create_permissive_cors_layer};
use crate::http::security::security_headers;
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Serve `router` until SIGTERM/SIGINT, without cleanup coordination.
///
/// For services that own closable resources (database pools), prefer
/// [`create_production_app`].
///
/// # Errors
/// Binding the listener or serving can fail with an I/O error.
pub async fn create_app(router: Router, server_config: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;

    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!("Serve loop failed: {:?}", e);
        })?;

    Ok(())
}

/// Wrap the app's routes with documentation, middleware, and a 404 fallback.
///
/// The result serves:
/// - the routes of `apis` nested under `/api`
/// - one OpenAPI document (from `T`) behind Swagger UI (`/swagger-ui`),
///   ReDoc (`/redoc`), RapiDoc (`/rapidoc`), and Scalar (`/scalar`)
/// - request tracing, security headers, CORS, and response compression
///
/// `apis` must already carry its state; the returned router is stateless.
/// Health endpoints are deliberately not included here, merge them with
/// [`super::health::health_router`] and an app-owned `/ready` route.
///
/// # CORS
/// `CORS_ALLOWED_ORIGIN` may hold comma-separated origins. Set, it becomes an
/// allow-list with credentials; unset, any origin is accepted, which suits
/// local development and same-origin deployments.
///
/// # Errors
/// Fails when `CORS_ALLOWED_ORIGIN` is set but empty or not a valid header
/// value.
pub async fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let cors_layer = cors_layer_from_env()?;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Build the CORS layer from `CORS_ALLOWED_ORIGIN`, permissive when unset.
fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let origins_str = match std::env::var("CORS_ALLOWED_ORIGIN") {
        Ok(value) => value,
        Err(_) => {
            info!("CORS_ALLOWED_ORIGIN not set, allowing any origin");
            return Ok(create_permissive_cors_layer());
        }
    };

    let allowed_origins: Vec<axum::http::HeaderValue> = origins_str
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<axum::http::HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if allowed_origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    info!("CORS allow-list: {}", origins_str);
    Ok(create_cors_layer(allowed_origins))
}

/// Serve `router` with coordinated shutdown and a bounded cleanup phase.
///
/// On SIGTERM/SIGINT the listener stops accepting, in-flight requests drain,
/// and `cleanup` runs with the grace period from
/// [`ServerConfig::shutdown_grace`] as its time budget. A cleanup that
/// overruns is abandoned with a warning rather than holding the process.
///
/// # Example
/// ```ignore
/// create_production_app(app, &config.server, async move {
///     db.close().await.ok();
/// })
/// .await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (coordinator, _rx) = ShutdownCoordinator::new();
    let shutdown_handle = coordinator.clone();
    let grace = server_config.shutdown_grace();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Listening on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        shutdown_handle.wait_for_signal().await;

        info!("Running cleanup with a {:?} budget", grace);
        match tokio::time::timeout(grace, cleanup).await {
            Ok(()) => info!("Cleanup finished"),
            Err(_) => {
                tracing::warn!("Cleanup still running after {:?}, abandoning it", grace);
            }
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(coordinated_shutdown(coordinator))
        .await
        .inspect_err(|e| {
            tracing::error!("Serve loop failed: {:?}", e);
        });

    // The process must not exit while cleanup is still closing connections
    cleanup_handle.await.ok();

    serve_result
}
