//! Catalog Domain
//!
//! This module provides a complete domain implementation for managing a
//! product catalog backed by PostgreSQL: categories and the products that
//! belong to them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← Business logic, validation, derived prices
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Postgres/in-memory implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_catalog::{handlers, postgres::PgCatalogRepository, storage::LocalImageStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = sea_orm::Database::connect("postgresql://localhost/catalog").await?;
//!
//! let repository = Arc::new(PgCatalogRepository::new(db));
//! let images = Arc::new(LocalImageStore::new("images"));
//!
//! // Create Axum router
//! let router = handlers::router(repository, images);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod storage;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use handlers::ApiDoc;
pub use models::{Category, CreateCategory, CreateProduct, Product, UpdateProduct};
pub use postgres::PgCatalogRepository;
pub use repository::{CatalogRepository, InMemoryCatalogRepository};
pub use service::{CategoryService, ProductService};
pub use storage::{ImageStore, LocalImageStore};
