//! Sea-ORM entities for the catalog tables.
//!
//! Conversions between rows and domain models are explicit field-by-field
//! `From` impls, so a shape change on either side is a compile error rather
//! than a silently dropped field.

use sea_orm::ActiveValue::{NotSet, Set};

use crate::models::{Category, CreateCategory, NewProduct, Product};

pub mod categories {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "categories")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::products::Entity")]
        Products,
    }

    impl Related<super::products::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Products.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod products {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub name: String,
        pub image: String,
        pub description: String,
        pub quantity: i32,
        pub price: f64,
        pub discount: f64,
        pub special_price: f64,
        pub category_id: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::categories::Entity",
            from = "Column::CategoryId",
            to = "super::categories::Column::Id",
            on_update = "Cascade",
            on_delete = "Restrict"
        )]
        Category,
    }

    impl Related<super::categories::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Category.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            category_id: model.id,
            category_name: model.name,
        }
    }
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            product_id: model.id,
            product_name: model.name,
            image: model.image,
            description: model.description,
            quantity: model.quantity,
            price: model.price,
            discount: model.discount,
            special_price: model.special_price,
            category_id: model.category_id,
        }
    }
}

// Inserts leave the id NotSet so the store assigns it.
impl From<CreateCategory> for categories::ActiveModel {
    fn from(input: CreateCategory) -> Self {
        categories::ActiveModel {
            id: NotSet,
            name: Set(input.category_name),
        }
    }
}

impl From<NewProduct> for products::ActiveModel {
    fn from(input: NewProduct) -> Self {
        products::ActiveModel {
            id: NotSet,
            name: Set(input.product_name),
            image: Set(input.image),
            description: Set(input.description),
            quantity: Set(input.quantity),
            price: Set(input.price),
            discount: Set(input.discount),
            special_price: Set(input.special_price),
            category_id: Set(input.category_id),
        }
    }
}
