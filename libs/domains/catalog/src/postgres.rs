use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};

use axum_helpers::pagination::{Page, PageRequest};

use crate::{
    entity,
    error::CatalogResult,
    models::{Category, CategorySortField, CreateCategory, NewProduct, Product, ProductSortField},
    repository::CatalogRepository,
};

pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Count the filtered set, then fetch one sorted page of it.
    async fn page_products(
        &self,
        query: Select<entity::products::Entity>,
        page: PageRequest,
    ) -> CatalogResult<Page<Product>> {
        let total_elements = query.clone().count(&self.db).await?;

        let models = order_products(query, &page)?
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let content = models.into_iter().map(Product::from).collect();
        Ok(Page::new(content, &page, total_elements))
    }
}

fn order_categories(
    query: Select<entity::categories::Entity>,
    page: &PageRequest,
) -> CatalogResult<Select<entity::categories::Entity>> {
    let column = match CategorySortField::parse(&page.sort.field)? {
        CategorySortField::Id => entity::categories::Column::Id,
        CategorySortField::Name => entity::categories::Column::Name,
    };
    Ok(query.order_by(column, sort_direction(page)))
}

fn order_products(
    query: Select<entity::products::Entity>,
    page: &PageRequest,
) -> CatalogResult<Select<entity::products::Entity>> {
    let column = match ProductSortField::parse(&page.sort.field)? {
        ProductSortField::Id => entity::products::Column::Id,
        ProductSortField::Name => entity::products::Column::Name,
        ProductSortField::Price => entity::products::Column::Price,
        ProductSortField::Quantity => entity::products::Column::Quantity,
        ProductSortField::Discount => entity::products::Column::Discount,
        ProductSortField::SpecialPrice => entity::products::Column::SpecialPrice,
    };
    Ok(query.order_by(column, sort_direction(page)))
}

fn sort_direction(page: &PageRequest) -> Order {
    if page.sort.order.is_ascending() {
        Order::Asc
    } else {
        Order::Desc
    }
}

/// Matches the `LOWER(name)` expression used by the unique index.
fn lower_name() -> Expr {
    Expr::expr(Func::lower(Expr::col(entity::products::Column::Name)))
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn insert_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        let active_model: entity::categories::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(category_id = model.id, "Created category");
        Ok(model.into())
    }

    async fn category_by_id(&self, id: i64) -> CatalogResult<Option<Category>> {
        let model = entity::categories::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Category::from))
    }

    async fn category_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let model = entity::categories::Entity::find()
            .filter(entity::categories::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(model.map(Category::from))
    }

    async fn list_categories(&self, page: PageRequest) -> CatalogResult<Page<Category>> {
        let query = entity::categories::Entity::find();
        let total_elements = query.clone().count(&self.db).await?;

        let models = order_categories(query, &page)?
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let content = models.into_iter().map(Category::from).collect();
        Ok(Page::new(content, &page, total_elements))
    }

    async fn save_category(&self, category: Category) -> CatalogResult<Category> {
        let active_model = entity::categories::ActiveModel {
            id: Set(category.category_id),
            name: Set(category.category_name),
        };
        let model = active_model.update(&self.db).await?;

        tracing::info!(category_id = model.id, "Updated category");
        Ok(model.into())
    }

    async fn delete_category(&self, id: i64) -> CatalogResult<bool> {
        let result = entity::categories::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(category_id = id, "Deleted category");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn insert_product(&self, input: NewProduct) -> CatalogResult<Product> {
        let active_model: entity::products::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(
            product_id = model.id,
            category_id = model.category_id,
            "Created product"
        );
        Ok(model.into())
    }

    async fn product_by_id(&self, id: i64) -> CatalogResult<Option<Product>> {
        let model = entity::products::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Product::from))
    }

    async fn list_products(&self, page: PageRequest) -> CatalogResult<Page<Product>> {
        self.page_products(entity::products::Entity::find(), page).await
    }

    async fn list_products_in_category(
        &self,
        category_id: i64,
        page: PageRequest,
    ) -> CatalogResult<Page<Product>> {
        let query = entity::products::Entity::find()
            .filter(entity::products::Column::CategoryId.eq(category_id));
        self.page_products(query, page).await
    }

    async fn search_products(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> CatalogResult<Page<Product>> {
        let pattern = format!("%{}%", keyword.to_lowercase());
        let query = entity::products::Entity::find().filter(lower_name().like(pattern));
        self.page_products(query, page).await
    }

    async fn product_name_taken(
        &self,
        category_id: i64,
        name: &str,
        exclude: Option<i64>,
    ) -> CatalogResult<bool> {
        let mut query = entity::products::Entity::find()
            .filter(entity::products::Column::CategoryId.eq(category_id))
            .filter(lower_name().eq(name.to_lowercase()));

        if let Some(id) = exclude {
            query = query.filter(entity::products::Column::Id.ne(id));
        }

        let count = query.count(&self.db).await?;
        Ok(count > 0)
    }

    async fn save_product(&self, product: Product) -> CatalogResult<Product> {
        let active_model = entity::products::ActiveModel {
            id: Set(product.product_id),
            name: Set(product.product_name),
            image: Set(product.image),
            description: Set(product.description),
            quantity: Set(product.quantity),
            price: Set(product.price),
            discount: Set(product.discount),
            special_price: Set(product.special_price),
            category_id: Set(product.category_id),
        };
        let model = active_model.update(&self.db).await?;

        tracing::info!(product_id = model.id, "Updated product");
        Ok(model.into())
    }

    async fn delete_product(&self, id: i64) -> CatalogResult<bool> {
        let result = entity::products::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete_products_in_category(&self, category_id: i64) -> CatalogResult<u64> {
        let result = entity::products::Entity::delete_many()
            .filter(entity::products::Column::CategoryId.eq(category_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(
                category_id,
                removed = result.rows_affected,
                "Deleted products in category"
            );
        }
        Ok(result.rows_affected)
    }
}
