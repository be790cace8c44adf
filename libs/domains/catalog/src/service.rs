//! Catalog services - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use axum_helpers::pagination::{Page, PageQuery, SortOrder};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CreateCategory, CreateProduct, NewProduct, Product, UpdateProduct,
    SORT_BY_CATEGORY_ID, SORT_BY_PRICE, SORT_BY_PRODUCT_ID, special_price,
};
use crate::repository::CatalogRepository;
use crate::storage::ImageStore;

/// Category service providing business logic operations
///
/// The service layer handles validation, uniqueness rules, and orchestrates
/// repository operations. Both services share one repository instance, so a
/// category delete can clear its products in the same store.
pub struct CategoryService<R: CatalogRepository> {
    repository: Arc<R>,
}

impl<R: CatalogRepository> CategoryService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// List categories, paged; an empty catalog is reported as not found
    #[instrument(skip(self))]
    pub async fn list_categories(&self, query: PageQuery) -> CatalogResult<Page<Category>> {
        let page = query.resolve(SORT_BY_CATEGORY_ID, SortOrder::Asc);
        let result = self.repository.list_categories(page).await?;

        if result.total_elements == 0 {
            return Err(CatalogError::NoResults("No categories found!".to_string()));
        }
        Ok(result)
    }

    /// Create a new category
    #[instrument(skip(self, input), fields(category_name = %input.category_name))]
    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        // Names collide only when written identically, matching the unique index
        if self
            .repository
            .category_by_name(&input.category_name)
            .await?
            .is_some()
        {
            return Err(CatalogError::DuplicateCategory(input.category_name));
        }

        self.repository.insert_category(input).await
    }

    /// Rename an existing category
    #[instrument(skip(self, input))]
    pub async fn update_category(&self, id: i64, input: CreateCategory) -> CatalogResult<Category> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let mut category = self
            .repository
            .category_by_id(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        if let Some(existing) = self.repository.category_by_name(&input.category_name).await? {
            if existing.category_id != id {
                return Err(CatalogError::DuplicateCategory(input.category_name));
            }
        }

        category.category_name = input.category_name;
        self.repository.save_category(category).await
    }

    /// Delete a category together with all of its products
    ///
    /// Returns a snapshot of the category as it was before deletion.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i64) -> CatalogResult<Category> {
        let category = self
            .repository
            .category_by_id(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        // Products go first; the FK would otherwise block the parent row
        self.repository.delete_products_in_category(id).await?;

        if !self.repository.delete_category(id).await? {
            return Err(CatalogError::CategoryNotFound(id));
        }
        Ok(category)
    }
}

impl<R: CatalogRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Product service providing business logic operations
///
/// Owns the derived-price rule: `specialPrice` is always computed from price
/// and discount here, never accepted from the caller.
pub struct ProductService<R: CatalogRepository, F: ImageStore> {
    repository: Arc<R>,
    images: Arc<F>,
}

impl<R: CatalogRepository, F: ImageStore> ProductService<R, F> {
    pub fn new(repository: Arc<R>, images: Arc<F>) -> Self {
        Self { repository, images }
    }

    /// Add a product to a category
    #[instrument(skip(self, input), fields(product_name = %input.product_name))]
    pub async fn add_product(
        &self,
        category_id: i64,
        input: CreateProduct,
    ) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let category = self
            .repository
            .category_by_id(category_id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(category_id))?;

        if self
            .repository
            .product_name_taken(category_id, &input.product_name, None)
            .await?
        {
            return Err(CatalogError::DuplicateProductInCategory {
                name: input.product_name,
                category: category.category_name,
            });
        }

        self.repository
            .insert_product(NewProduct::from_request(category_id, input))
            .await
    }

    /// List all products, paged; an empty catalog is reported as not found
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: PageQuery) -> CatalogResult<Page<Product>> {
        let page = query.resolve(SORT_BY_PRODUCT_ID, SortOrder::Asc);
        let result = self.repository.list_products(page).await?;

        if result.total_elements == 0 {
            return Err(CatalogError::NoResults("No products found!".to_string()));
        }
        Ok(result)
    }

    /// List the products of one category, cheapest first unless sorted otherwise
    #[instrument(skip(self))]
    pub async fn list_products_by_category(
        &self,
        category_id: i64,
        query: PageQuery,
    ) -> CatalogResult<Page<Product>> {
        let category = self
            .repository
            .category_by_id(category_id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(category_id))?;

        let page = query.resolve(SORT_BY_PRICE, SortOrder::Asc);
        let result = self
            .repository
            .list_products_in_category(category_id, page)
            .await?;

        if result.total_elements == 0 {
            return Err(CatalogError::NoResults(format!(
                "No products found in {} category!",
                category.category_name
            )));
        }
        Ok(result)
    }

    /// Search products by a case-insensitive name fragment
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        keyword: &str,
        query: PageQuery,
    ) -> CatalogResult<Page<Product>> {
        let page = query.resolve(SORT_BY_PRODUCT_ID, SortOrder::Asc);
        let result = self.repository.search_products(keyword, page).await?;

        if result.total_elements == 0 {
            return Err(CatalogError::NoResults(format!(
                "No products found with keyword: {keyword}"
            )));
        }
        Ok(result)
    }

    /// Update a product's editable fields
    ///
    /// The image and the owning category are left untouched; they change
    /// through their own endpoints.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: i64, input: UpdateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let mut product = self
            .repository
            .product_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        if self
            .repository
            .product_name_taken(product.category_id, &input.product_name, Some(id))
            .await?
        {
            return Err(CatalogError::DuplicateProduct(input.product_name));
        }

        product.product_name = input.product_name;
        product.description = input.description;
        product.quantity = input.quantity;
        product.price = input.price;
        product.discount = input.discount;
        product.special_price = special_price(input.price, input.discount);

        self.repository.save_product(product).await
    }

    /// Store an uploaded image and point the product at it
    #[instrument(skip(self, data))]
    pub async fn update_product_image(
        &self,
        id: i64,
        file_name_hint: &str,
        data: &[u8],
    ) -> CatalogResult<Product> {
        let mut product = self
            .repository
            .product_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        product.image = self.images.store(file_name_hint, data).await?;
        self.repository.save_product(product).await
    }

    /// Delete a product
    ///
    /// Returns a snapshot of the product as it was before deletion.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> CatalogResult<Product> {
        let product = self
            .repository
            .product_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        if !self.repository.delete_product(id).await? {
            return Err(CatalogError::ProductNotFound(id));
        }
        Ok(product)
    }
}

impl<R: CatalogRepository, F: ImageStore> Clone for ProductService<R, F> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            images: Arc::clone(&self.images),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCatalogRepository;
    use crate::storage::MockImageStore;
    use test_utils::assertions::assert_close;

    fn electronics() -> Category {
        Category {
            category_id: 1,
            category_name: "Electronics".to_string(),
        }
    }

    fn phone(id: i64) -> Product {
        Product {
            product_id: id,
            product_name: "Phone".to_string(),
            image: "camera.png".to_string(),
            description: "A phone".to_string(),
            quantity: 3,
            price: 1000.0,
            discount: 10.0,
            special_price: 900.0,
            category_id: 1,
        }
    }

    fn create_product_request(name: &str) -> CreateProduct {
        CreateProduct {
            product_name: name.to_string(),
            description: "Brand new".to_string(),
            quantity: 5,
            price: 1000.0,
            discount: 10.0,
        }
    }

    fn product_service(
        repo: MockCatalogRepository,
    ) -> ProductService<MockCatalogRepository, MockImageStore> {
        ProductService::new(Arc::new(repo), Arc::new(MockImageStore::new()))
    }

    #[tokio::test]
    async fn test_create_category_rejects_short_name_before_store_call() {
        // No expectations: any repository call would panic
        let service = CategoryService::new(Arc::new(MockCatalogRepository::new()));

        let result = service
            .create_category(CreateCategory {
                category_name: "Toys".to_string(),
            })
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_category_rejects_duplicate_name() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_category_by_name()
            .returning(|_| Ok(Some(electronics())));
        let service = CategoryService::new(Arc::new(repo));

        let result = service
            .create_category(CreateCategory {
                category_name: "Electronics".to_string(),
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Category with name Electronics already exists!"
        );
    }

    #[tokio::test]
    async fn test_update_category_allows_keeping_own_name() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_category_by_id()
            .returning(|_| Ok(Some(electronics())));
        repo.expect_category_by_name()
            .returning(|_| Ok(Some(electronics())));
        repo.expect_save_category().returning(Ok);
        let service = CategoryService::new(Arc::new(repo));

        let result = service
            .update_category(
                1,
                CreateCategory {
                    category_name: "Electronics".to_string(),
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_category_removes_products_first() {
        let mut seq = mockall::Sequence::new();
        let mut repo = MockCatalogRepository::new();
        repo.expect_category_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(electronics())));
        repo.expect_delete_products_in_category()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(2));
        repo.expect_delete_category()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        let service = CategoryService::new(Arc::new(repo));

        let snapshot = service.delete_category(1).await.unwrap();

        assert_eq!(snapshot, electronics());
    }

    #[tokio::test]
    async fn test_delete_missing_category_reports_id() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_category_by_id().returning(|_| Ok(None));
        let service = CategoryService::new(Arc::new(repo));

        let err = service.delete_category(42).await.unwrap_err();

        assert_eq!(err.to_string(), "Category not found with categoryId: 42");
    }

    #[tokio::test]
    async fn test_list_categories_maps_empty_catalog_to_not_found() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_list_categories()
            .returning(|page| Ok(Page::new(vec![], &page, 0)));
        let service = CategoryService::new(Arc::new(repo));

        let err = service.list_categories(PageQuery::default()).await.unwrap_err();

        assert_eq!(err.to_string(), "No categories found!");
    }

    #[tokio::test]
    async fn test_add_product_computes_special_price() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_category_by_id()
            .returning(|_| Ok(Some(electronics())));
        repo.expect_product_name_taken().returning(|_, _, _| Ok(false));
        repo.expect_insert_product().returning(|input| {
            Ok(Product {
                product_id: 10,
                product_name: input.product_name,
                image: input.image,
                description: input.description,
                quantity: input.quantity,
                price: input.price,
                discount: input.discount,
                special_price: input.special_price,
                category_id: input.category_id,
            })
        });
        let service = product_service(repo);

        let product = service
            .add_product(1, create_product_request("Phone"))
            .await
            .unwrap();

        assert_close(product.special_price, 900.0, "special price");
        assert_eq!(product.image, "default.png");
        assert_eq!(product.category_id, 1);
    }

    #[tokio::test]
    async fn test_add_product_rejects_duplicate_name_in_category() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_category_by_id()
            .returning(|_| Ok(Some(electronics())));
        repo.expect_product_name_taken().returning(|_, _, _| Ok(true));
        let service = product_service(repo);

        let err = service
            .add_product(1, create_product_request("Phone"))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Product with name Phone already exists in category Electronics"
        );
    }

    #[tokio::test]
    async fn test_add_product_to_missing_category() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_category_by_id().returning(|_| Ok(None));
        let service = product_service(repo);

        let err = service
            .add_product(42, create_product_request("Phone"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Category not found with categoryId: 42");
    }

    #[tokio::test]
    async fn test_update_product_preserves_image_and_category() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_product_by_id().returning(|_| Ok(Some(phone(5))));
        repo.expect_product_name_taken()
            .withf(|category_id, name, exclude| {
                *category_id == 1 && name == "Smartphone" && *exclude == Some(5)
            })
            .returning(|_, _, _| Ok(false));
        repo.expect_save_product().returning(Ok);
        let service = product_service(repo);

        let updated = service
            .update_product(
                5,
                UpdateProduct {
                    product_name: "Smartphone".to_string(),
                    description: "Renamed".to_string(),
                    quantity: 8,
                    price: 500.0,
                    discount: 20.0,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.image, "camera.png");
        assert_eq!(updated.category_id, 1);
        assert_close(updated.special_price, 400.0, "recomputed special price");
    }

    #[tokio::test]
    async fn test_update_product_rejects_name_held_by_sibling() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_product_by_id().returning(|_| Ok(Some(phone(5))));
        repo.expect_product_name_taken().returning(|_, _, _| Ok(true));
        let service = product_service(repo);

        let err = service
            .update_product(
                5,
                UpdateProduct {
                    product_name: "Tablet".to_string(),
                    description: String::new(),
                    quantity: 1,
                    price: 10.0,
                    discount: 0.0,
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Product with name Tablet already exists!");
    }

    #[tokio::test]
    async fn test_update_product_image_stores_and_saves() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_product_by_id().returning(|_| Ok(Some(phone(5))));
        repo.expect_save_product().returning(Ok);
        let mut images = MockImageStore::new();
        images
            .expect_store()
            .withf(|hint, data| hint == "photo.png" && data == b"bytes")
            .returning(|_, _| Ok("generated.png".to_string()));
        let service = ProductService::new(Arc::new(repo), Arc::new(images));

        let updated = service
            .update_product_image(5, "photo.png", b"bytes")
            .await
            .unwrap();

        assert_eq!(updated.image, "generated.png");
    }

    #[tokio::test]
    async fn test_delete_product_returns_snapshot() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_product_by_id().returning(|_| Ok(Some(phone(5))));
        repo.expect_delete_product().returning(|_| Ok(true));
        let service = product_service(repo);

        let snapshot = service.delete_product(5).await.unwrap();

        assert_eq!(snapshot, phone(5));
    }

    #[tokio::test]
    async fn test_list_products_by_category_names_the_category_when_empty() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_category_by_id()
            .returning(|_| Ok(Some(electronics())));
        repo.expect_list_products_in_category()
            .withf(|_, page| page.sort.field == "price" && page.sort.order.is_ascending())
            .returning(|_, page| Ok(Page::new(vec![], &page, 0)));
        let service = product_service(repo);

        let err = service
            .list_products_by_category(1, PageQuery::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No products found in Electronics category!");
    }

    #[tokio::test]
    async fn test_search_with_no_matches_echoes_keyword() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_search_products()
            .returning(|_, page| Ok(Page::new(vec![], &page, 0)));
        let service = product_service(repo);

        let err = service
            .search_products("xyz", PageQuery::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No products found with keyword: xyz");
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_not_an_error() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_list_products()
            .returning(|page| Ok(Page::new(vec![], &page, 120)));
        let service = product_service(repo);

        let page = service
            .list_products(PageQuery {
                page_number: Some(9),
                page_size: Some(50),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 120);
        assert!(page.last_page);
    }
}
