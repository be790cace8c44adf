//! Catalog API routes

use std::sync::Arc;

use axum::Router;
use domain_catalog::{handlers, LocalImageStore, PgCatalogRepository};

use crate::state::AppState;

/// Create the catalog router (categories and products share one repository)
pub fn router(state: &AppState) -> Router {
    let repository = Arc::new(PgCatalogRepository::new(state.db.clone()));
    let images = Arc::new(LocalImageStore::new(state.config.image_dir.clone()));
    handlers::router(repository, images)
}
