//! HTTP handlers for the Catalog API

use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
    pagination::{Page, PageQuery},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, CreateCategory, CreateProduct, Product, UpdateProduct};
use crate::repository::CatalogRepository;
use crate::service::{CategoryService, ProductService};
use crate::storage::ImageStore;

/// OpenAPI documentation for the Catalog API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        update_category,
        delete_category,
        list_products_by_category,
        add_product,
        list_products,
        search_products,
        update_product,
        delete_product,
        update_product_image,
    ),
    components(
        schemas(
            Category, CreateCategory, Product, CreateProduct, UpdateProduct,
            UploadImageForm, Page<Category>, Page<Product>
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Categories", description = "Category management endpoints"),
        (name = "Products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Shared state for the catalog routes
///
/// Both services wrap the same repository, so category deletes and product
/// lookups observe one consistent store.
struct ApiState<R: CatalogRepository, F: ImageStore> {
    categories: CategoryService<R>,
    products: ProductService<R, F>,
}

/// Create the catalog router with all HTTP endpoints
pub fn router<R: CatalogRepository + 'static, F: ImageStore + 'static>(
    repository: Arc<R>,
    images: Arc<F>,
) -> Router {
    let state = Arc::new(ApiState {
        categories: CategoryService::new(Arc::clone(&repository)),
        products: ProductService::new(repository, images),
    });

    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/categories/{id}/products", get(list_products_by_category))
        .route("/categories/{id}/product", post(add_product))
        .route("/products", get(list_products))
        .route("/products/keyword/{keyword}", get(search_products))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/products/{id}/image", put(update_product_image))
        .with_state(state)
}

/// List categories as a page
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    params(PageQuery),
    responses(
        (status = 200, description = "A page of categories", body = Page<Category>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CatalogRepository, F: ImageStore>(
    State(state): State<Arc<ApiState<R, F>>>,
    Query(query): Query<PageQuery>,
) -> CatalogResult<Json<Page<Category>>> {
    let page = state.categories.list_categories(query).await?;
    Ok(Json(page))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created successfully", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CatalogRepository, F: ImageStore>(
    State(state): State<Arc<ApiState<R, F>>>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<impl IntoResponse> {
    let category = state.categories.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Rename a category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body = CreateCategory,
    responses(
        (status = 200, description = "Category updated successfully", body = Category),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<R: CatalogRepository, F: ImageStore>(
    State(state): State<Arc<ApiState<R, F>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<Json<Category>> {
    let category = state.categories.update_category(id, input).await?;
    Ok(Json(category))
}

/// Delete a category together with its products
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Deleted category", body = Category),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CatalogRepository, F: ImageStore>(
    State(state): State<Arc<ApiState<R, F>>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<Category>> {
    let category = state.categories.delete_category(id).await?;
    Ok(Json(category))
}

/// List the products of a category, cheapest first by default
#[utoipa::path(
    get,
    path = "/categories/{id}/products",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Category ID"),
        PageQuery
    ),
    responses(
        (status = 200, description = "A page of the category's products", body = Page<Product>),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products_by_category<R: CatalogRepository, F: ImageStore>(
    State(state): State<Arc<ApiState<R, F>>>,
    IdPath(id): IdPath,
    Query(query): Query<PageQuery>,
) -> CatalogResult<Json<Page<Product>>> {
    let page = state.products.list_products_by_category(id, query).await?;
    Ok(Json(page))
}

/// Add a product to a category
#[utoipa::path(
    post,
    path = "/categories/{id}/product",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_product<R: CatalogRepository, F: ImageStore>(
    State(state): State<Arc<ApiState<R, F>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> CatalogResult<impl IntoResponse> {
    let product = state.products.add_product(id, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// List all products as a page
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(PageQuery),
    responses(
        (status = 200, description = "A page of products", body = Page<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: CatalogRepository, F: ImageStore>(
    State(state): State<Arc<ApiState<R, F>>>,
    Query(query): Query<PageQuery>,
) -> CatalogResult<Json<Page<Product>>> {
    let page = state.products.list_products(query).await?;
    Ok(Json(page))
}

/// Search products by a name fragment
#[utoipa::path(
    get,
    path = "/products/keyword/{keyword}",
    tag = "Products",
    params(
        ("keyword" = String, Path, description = "Case-insensitive name fragment"),
        PageQuery
    ),
    responses(
        (status = 200, description = "A page of matching products", body = Page<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<R: CatalogRepository, F: ImageStore>(
    State(state): State<Arc<ApiState<R, F>>>,
    axum::extract::Path(keyword): axum::extract::Path<String>,
    Query(query): Query<PageQuery>,
) -> CatalogResult<Json<Page<Product>>> {
    let page = state.products.search_products(&keyword, query).await?;
    Ok(Json(page))
}

/// Update a product's editable fields
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: CatalogRepository, F: ImageStore>(
    State(state): State<Arc<ApiState<R, F>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> CatalogResult<Json<Product>> {
    let product = state.products.update_product(id, input).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product", body = Product),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: CatalogRepository, F: ImageStore>(
    State(state): State<Arc<ApiState<R, F>>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<Product>> {
    let product = state.products.delete_product(id).await?;
    Ok(Json(product))
}

/// Multipart form carrying a product image
#[derive(utoipa::ToSchema)]
pub struct UploadImageForm {
    /// Image file contents
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Replace a product's image
#[utoipa::path(
    put,
    path = "/products/{id}/image",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body(content = UploadImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product image updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product_image<R: CatalogRepository, F: ImageStore>(
    State(state): State<Arc<ApiState<R, F>>>,
    IdPath(id): IdPath,
    mut multipart: Multipart,
) -> CatalogResult<Json<Product>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CatalogError::Validation(e.to_string()))?
    {
        if field.name() == Some("image") {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| CatalogError::Validation(e.to_string()))?;

            let product = state
                .products
                .update_product_image(id, &file_name, &data)
                .await?;
            return Ok(Json(product));
        }
    }

    Err(CatalogError::Validation(
        "Missing multipart field: image".to_string(),
    ))
}
