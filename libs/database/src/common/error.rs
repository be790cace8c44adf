use thiserror::Error;

/// Errors surfaced by the database layer.
///
/// Connection setup, health probes, and migration running funnel their
/// failures through this one type so callers match on a single enum.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Driver-level failure reported by SeaORM
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// The readiness probe query did not come back
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

/// Result alias for database layer operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
