use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use axum_helpers::pagination::{Page, PageRequest};

use crate::error::CatalogResult;
use crate::models::{
    Category, CategorySortField, CreateCategory, NewProduct, Product, ProductSortField,
};

/// Store trait for catalog persistence
///
/// One store covers both aggregates because the interesting operations
/// (cascade delete, per-category uniqueness) span the two tables.
/// Implementations can use different storage backends (PostgreSQL, in-memory).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Insert a category; the store assigns the id
    async fn insert_category(&self, input: CreateCategory) -> CatalogResult<Category>;

    /// Get a category by id
    async fn category_by_id(&self, id: i64) -> CatalogResult<Option<Category>>;

    /// Get a category by exact (case-sensitive) name
    async fn category_by_name(&self, name: &str) -> CatalogResult<Option<Category>>;

    /// List categories, paged and sorted
    async fn list_categories(&self, page: PageRequest) -> CatalogResult<Page<Category>>;

    /// Persist a modified category (id must already exist)
    async fn save_category(&self, category: Category) -> CatalogResult<Category>;

    /// Delete a category by id; false when the id was absent
    async fn delete_category(&self, id: i64) -> CatalogResult<bool>;

    /// Insert a product; the store assigns the id
    async fn insert_product(&self, input: NewProduct) -> CatalogResult<Product>;

    /// Get a product by id
    async fn product_by_id(&self, id: i64) -> CatalogResult<Option<Product>>;

    /// List all products, paged and sorted
    async fn list_products(&self, page: PageRequest) -> CatalogResult<Page<Product>>;

    /// List the products of one category, paged and sorted
    async fn list_products_in_category(
        &self,
        category_id: i64,
        page: PageRequest,
    ) -> CatalogResult<Page<Product>>;

    /// Case-insensitive substring search on product names
    async fn search_products(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> CatalogResult<Page<Product>>;

    /// Whether a product name is already used within a category
    /// (case-insensitive); `exclude` skips the product being renamed
    async fn product_name_taken(
        &self,
        category_id: i64,
        name: &str,
        exclude: Option<i64>,
    ) -> CatalogResult<bool>;

    /// Persist a modified product (id must already exist)
    async fn save_product(&self, product: Product) -> CatalogResult<Product>;

    /// Delete a product by id; false when the id was absent
    async fn delete_product(&self, id: i64) -> CatalogResult<bool>;

    /// Delete every product of a category, returning how many were removed
    async fn delete_products_in_category(&self, category_id: i64) -> CatalogResult<u64>;
}

/// In-memory implementation of CatalogRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogRepository {
    categories: Arc<RwLock<HashMap<i64, Category>>>,
    products: Arc<RwLock<HashMap<i64, Product>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Slice one page out of a fully sorted result set.
fn page_slice<T>(items: Vec<T>, page: &PageRequest) -> Page<T> {
    let total_elements = items.len() as u64;
    let content = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    Page::new(content, page, total_elements)
}

fn sort_products(items: &mut [Product], page: &PageRequest) -> CatalogResult<()> {
    let field = ProductSortField::parse(&page.sort.field)?;
    items.sort_by(|a, b| {
        let ordering = match field {
            ProductSortField::Id => a.product_id.cmp(&b.product_id),
            ProductSortField::Name => a.product_name.cmp(&b.product_name),
            ProductSortField::Price => a.price.total_cmp(&b.price),
            ProductSortField::Quantity => a.quantity.cmp(&b.quantity),
            ProductSortField::Discount => a.discount.total_cmp(&b.discount),
            ProductSortField::SpecialPrice => a.special_price.total_cmp(&b.special_price),
        };
        if page.sort.order.is_ascending() {
            ordering
        } else {
            ordering.reverse()
        }
    });
    Ok(())
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn insert_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        let mut categories = self.categories.write().await;

        let category = Category {
            category_id: self.next_id(),
            category_name: input.category_name,
        };
        categories.insert(category.category_id, category.clone());

        tracing::info!(category_id = category.category_id, "Created category");
        Ok(category)
    }

    async fn category_by_id(&self, id: i64) -> CatalogResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).cloned())
    }

    async fn category_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories
            .values()
            .find(|c| c.category_name == name)
            .cloned())
    }

    async fn list_categories(&self, page: PageRequest) -> CatalogResult<Page<Category>> {
        let categories = self.categories.read().await;
        let mut items: Vec<Category> = categories.values().cloned().collect();

        let field = CategorySortField::parse(&page.sort.field)?;
        items.sort_by(|a, b| {
            let ordering = match field {
                CategorySortField::Id => a.category_id.cmp(&b.category_id),
                CategorySortField::Name => a.category_name.cmp(&b.category_name),
            };
            if page.sort.order.is_ascending() {
                ordering
            } else {
                ordering.reverse()
            }
        });

        Ok(page_slice(items, &page))
    }

    async fn save_category(&self, category: Category) -> CatalogResult<Category> {
        let mut categories = self.categories.write().await;
        categories.insert(category.category_id, category.clone());

        tracing::info!(category_id = category.category_id, "Updated category");
        Ok(category)
    }

    async fn delete_category(&self, id: i64) -> CatalogResult<bool> {
        let mut categories = self.categories.write().await;

        if categories.remove(&id).is_some() {
            tracing::info!(category_id = id, "Deleted category");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn insert_product(&self, input: NewProduct) -> CatalogResult<Product> {
        let mut products = self.products.write().await;

        let product = Product {
            product_id: self.next_id(),
            product_name: input.product_name,
            image: input.image,
            description: input.description,
            quantity: input.quantity,
            price: input.price,
            discount: input.discount,
            special_price: input.special_price,
            category_id: input.category_id,
        };
        products.insert(product.product_id, product.clone());

        tracing::info!(
            product_id = product.product_id,
            category_id = product.category_id,
            "Created product"
        );
        Ok(product)
    }

    async fn product_by_id(&self, id: i64) -> CatalogResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn list_products(&self, page: PageRequest) -> CatalogResult<Page<Product>> {
        let products = self.products.read().await;
        let mut items: Vec<Product> = products.values().cloned().collect();

        sort_products(&mut items, &page)?;
        Ok(page_slice(items, &page))
    }

    async fn list_products_in_category(
        &self,
        category_id: i64,
        page: PageRequest,
    ) -> CatalogResult<Page<Product>> {
        let products = self.products.read().await;
        let mut items: Vec<Product> = products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect();

        sort_products(&mut items, &page)?;
        Ok(page_slice(items, &page))
    }

    async fn search_products(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> CatalogResult<Page<Product>> {
        let needle = keyword.to_lowercase();
        let products = self.products.read().await;
        let mut items: Vec<Product> = products
            .values()
            .filter(|p| p.product_name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        sort_products(&mut items, &page)?;
        Ok(page_slice(items, &page))
    }

    async fn product_name_taken(
        &self,
        category_id: i64,
        name: &str,
        exclude: Option<i64>,
    ) -> CatalogResult<bool> {
        let products = self.products.read().await;
        let taken = products.values().any(|p| {
            p.category_id == category_id
                && exclude != Some(p.product_id)
                && p.product_name.to_lowercase() == name.to_lowercase()
        });
        Ok(taken)
    }

    async fn save_product(&self, product: Product) -> CatalogResult<Product> {
        let mut products = self.products.write().await;
        products.insert(product.product_id, product.clone());

        tracing::info!(product_id = product.product_id, "Updated product");
        Ok(product)
    }

    async fn delete_product(&self, id: i64) -> CatalogResult<bool> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete_products_in_category(&self, category_id: i64) -> CatalogResult<u64> {
        let mut products = self.products.write().await;

        let before = products.len();
        products.retain(|_, p| p.category_id != category_id);
        let removed = (before - products.len()) as u64;

        if removed > 0 {
            tracing::info!(category_id, removed, "Deleted products in category");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_helpers::pagination::{PageQuery, SortOrder};
    use crate::error::CatalogError;
    use crate::models::{SORT_BY_CATEGORY_ID, SORT_BY_PRODUCT_ID};

    fn page(page_number: u64, page_size: u64, sort_by: &str, sort_order: &str) -> PageRequest {
        PageQuery {
            page_number: Some(page_number),
            page_size: Some(page_size),
            sort_by: Some(sort_by.to_string()),
            sort_order: Some(sort_order.to_string()),
        }
        .resolve(SORT_BY_CATEGORY_ID, SortOrder::Asc)
    }

    fn new_product(name: &str, price: f64, category_id: i64) -> NewProduct {
        NewProduct {
            product_name: name.to_string(),
            image: "default.png".to_string(),
            description: String::new(),
            quantity: 1,
            price,
            discount: 0.0,
            special_price: price,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_category() {
        let repo = InMemoryCatalogRepository::new();

        let created = repo
            .insert_category(CreateCategory {
                category_name: "Electronics".to_string(),
            })
            .await
            .unwrap();

        let by_id = repo.category_by_id(created.category_id).await.unwrap();
        assert_eq!(by_id, Some(created.clone()));

        let by_name = repo.category_by_name("Electronics").await.unwrap();
        assert_eq!(by_name, Some(created));

        // Exact match is case-sensitive
        let miss = repo.category_by_name("electronics").await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_list_categories_sorts_and_slices() {
        let repo = InMemoryCatalogRepository::new();
        for name in ["Gadgets", "Apparel", "Kitchen"] {
            repo.insert_category(CreateCategory {
                category_name: name.to_string(),
            })
            .await
            .unwrap();
        }

        let result = repo
            .list_categories(page(0, 2, "categoryName", "desc"))
            .await
            .unwrap();

        assert_eq!(result.total_elements, 3);
        assert_eq!(result.total_pages, 2);
        assert!(!result.last_page);
        let names: Vec<&str> = result
            .content
            .iter()
            .map(|c| c.category_name.as_str())
            .collect();
        assert_eq!(names, vec!["Kitchen", "Gadgets"]);
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_sort_field() {
        let repo = InMemoryCatalogRepository::new();
        repo.insert_category(CreateCategory {
            category_name: "Electronics".to_string(),
        })
        .await
        .unwrap();

        let result = repo
            .list_categories(page(0, 10, "shoeSize", "asc"))
            .await;

        assert!(matches!(result, Err(CatalogError::UnknownSortField(f)) if f == "shoeSize"));
    }

    #[tokio::test]
    async fn test_product_name_taken_is_case_insensitive() {
        let repo = InMemoryCatalogRepository::new();
        let phone = repo.insert_product(new_product("Phone", 500.0, 1)).await.unwrap();

        assert!(repo.product_name_taken(1, "phone", None).await.unwrap());
        assert!(repo.product_name_taken(1, "PHONE", None).await.unwrap());
        // Same name in another category is free
        assert!(!repo.product_name_taken(2, "phone", None).await.unwrap());
        // The product itself is skipped when renaming
        assert!(
            !repo
                .product_name_taken(1, "Phone", Some(phone.product_id))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_search_matches_substring_case_insensitive() {
        let repo = InMemoryCatalogRepository::new();
        repo.insert_product(new_product("Smartphone", 700.0, 1)).await.unwrap();
        repo.insert_product(new_product("Head PHONE stand", 30.0, 1)).await.unwrap();
        repo.insert_product(new_product("Charger", 20.0, 1)).await.unwrap();

        let result = repo
            .search_products("phone", page(0, 10, SORT_BY_PRODUCT_ID, "asc"))
            .await
            .unwrap();

        assert_eq!(result.total_elements, 2);
    }

    #[tokio::test]
    async fn test_delete_products_in_category_counts_children() {
        let repo = InMemoryCatalogRepository::new();
        let kept = repo.insert_product(new_product("Kettle", 40.0, 2)).await.unwrap();
        for name in ["Phone", "Tablet", "Laptop"] {
            repo.insert_product(new_product(name, 100.0, 1)).await.unwrap();
        }

        let removed = repo.delete_products_in_category(1).await.unwrap();
        assert_eq!(removed, 3);

        // The other category's product is untouched
        assert!(repo.product_by_id(kept.product_id).await.unwrap().is_some());
        let remaining = repo
            .list_products(page(0, 10, SORT_BY_PRODUCT_ID, "asc"))
            .await
            .unwrap();
        assert_eq!(remaining.total_elements, 1);
    }

    #[tokio::test]
    async fn test_products_sort_by_price() {
        let repo = InMemoryCatalogRepository::new();
        repo.insert_product(new_product("Laptop", 1500.0, 1)).await.unwrap();
        repo.insert_product(new_product("Charger", 20.0, 1)).await.unwrap();
        repo.insert_product(new_product("Phone", 700.0, 1)).await.unwrap();

        let result = repo
            .list_products_in_category(1, page(0, 10, "price", "asc"))
            .await
            .unwrap();

        let prices: Vec<f64> = result.content.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![20.0, 700.0, 1500.0]);
    }
}
