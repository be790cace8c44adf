use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found with categoryId: {0}")]
    CategoryNotFound(i64),

    #[error("Product not found with productId: {0}")]
    ProductNotFound(i64),

    /// Empty-result policy: listings over an empty (filtered) collection
    /// carry their own user-facing message.
    #[error("{0}")]
    NoResults(String),

    #[error("Category with name {0} already exists!")]
    DuplicateCategory(String),

    #[error("Product with name {name} already exists in category {category}")]
    DuplicateProductInCategory { name: String, category: String },

    #[error("Product with name {0} already exists!")]
    DuplicateProduct(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Image storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound(id) => {
                AppError::NotFound(format!("Category not found with categoryId: {}", id))
            }
            CatalogError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product not found with productId: {}", id))
            }
            CatalogError::NoResults(msg) => AppError::NotFound(msg),
            CatalogError::DuplicateCategory(name) => {
                AppError::Conflict(format!("Category with name {} already exists!", name))
            }
            CatalogError::DuplicateProductInCategory { name, category } => AppError::Conflict(
                format!("Product with name {} already exists in category {}", name, category),
            ),
            CatalogError::DuplicateProduct(name) => {
                AppError::Conflict(format!("Product with name {} already exists!", name))
            }
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::UnknownSortField(field) => {
                AppError::BadRequest(format!("Unknown sort field: {}", field))
            }
            CatalogError::Storage(e) => AppError::Io(e),
            CatalogError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        // Convert to AppError for the standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
