use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};

/// Image filename assigned to every product until one is uploaded.
pub const DEFAULT_PRODUCT_IMAGE: &str = "default.png";

/// Default sort fields for the paged listings.
pub const SORT_BY_CATEGORY_ID: &str = "categoryId";
pub const SORT_BY_PRODUCT_ID: &str = "productId";
pub const SORT_BY_PRICE: &str = "price";

/// Custom validator rejecting names that are empty or all whitespace
fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Catalog category - groups products and owns their lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier, store-assigned and immutable
    pub category_id: i64,
    /// Category name, unique across the catalog (case-sensitive)
    pub category_name: String,
}

/// Catalog product, always owned by exactly one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier, store-assigned and immutable
    pub product_id: i64,
    /// Product name, unique within the owning category (case-insensitive)
    pub product_name: String,
    /// Stored image filename
    pub image: String,
    /// Free-text description
    pub description: String,
    /// Units in stock
    pub quantity: i32,
    /// Base price before discount
    pub price: f64,
    /// Discount percentage in [0, 100]
    pub discount: f64,
    /// Derived price after discount; never caller-supplied
    pub special_price: f64,
    /// Owning category, fixed at creation
    pub category_id: i64,
}

/// DTO for creating or renaming a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    #[validate(
        custom(function = "validate_not_blank"),
        length(min = 5, message = "Category name must be at least 5 characters")
    )]
    pub category_name: String,
}

/// DTO for adding a product to a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(
        custom(function = "validate_not_blank"),
        length(min = 3, message = "Product name must be at least 3 characters")
    )]
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub quantity: i32,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default)]
    pub discount: f64,
}

/// DTO for updating an existing product
///
/// Replaces the listed fields wholesale; `image` and the owning category are
/// only changed through their dedicated operations.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(
        custom(function = "validate_not_blank"),
        length(min = 3, message = "Product name must be at least 3 characters")
    )]
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub quantity: i32,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default)]
    pub discount: f64,
}

/// Insert record assembled by the product service after validation.
///
/// Carries the caller-supplied fields plus everything the service derives:
/// the image sentinel, the computed special price and the owning category.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub product_name: String,
    pub image: String,
    pub description: String,
    pub quantity: i32,
    pub price: f64,
    pub discount: f64,
    pub special_price: f64,
    pub category_id: i64,
}

impl NewProduct {
    /// Build the insert record for a validated create request.
    pub fn from_request(category_id: i64, input: CreateProduct) -> Self {
        let special_price = special_price(input.price, input.discount);
        Self {
            product_name: input.product_name,
            image: DEFAULT_PRODUCT_IMAGE.to_string(),
            description: input.description,
            quantity: input.quantity,
            price: input.price,
            discount: input.discount,
            special_price,
            category_id,
        }
    }
}

/// The one place the discounted price is derived.
///
/// `discount` is a percentage, so a 10% discount on 1000.0 yields 900.0.
pub fn special_price(price: f64, discount: f64) -> f64 {
    price - (discount * 0.01 * price)
}

/// Sortable category attributes, parsed from the caller's `sortBy` token.
///
/// Parsing lives with the stores: an unknown token is a store-level error,
/// not a validation failure in the domain services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CategorySortField {
    Id,
    Name,
}

impl CategorySortField {
    pub(crate) fn parse(field: &str) -> CatalogResult<Self> {
        match field {
            "categoryId" => Ok(CategorySortField::Id),
            "categoryName" => Ok(CategorySortField::Name),
            other => Err(CatalogError::UnknownSortField(other.to_string())),
        }
    }
}

/// Sortable product attributes, parsed from the caller's `sortBy` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProductSortField {
    Id,
    Name,
    Price,
    Quantity,
    Discount,
    SpecialPrice,
}

impl ProductSortField {
    pub(crate) fn parse(field: &str) -> CatalogResult<Self> {
        match field {
            "productId" => Ok(ProductSortField::Id),
            "productName" => Ok(ProductSortField::Name),
            "price" => Ok(ProductSortField::Price),
            "quantity" => Ok(ProductSortField::Quantity),
            "discount" => Ok(ProductSortField::Discount),
            "specialPrice" => Ok(ProductSortField::SpecialPrice),
            other => Err(CatalogError::UnknownSortField(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assertions::assert_close;
    use validator::Validate;

    #[test]
    fn test_special_price_applies_percentage_discount() {
        assert_close(special_price(1000.0, 10.0), 900.0, "10% off 1000");
        assert_close(special_price(500.0, 0.0), 500.0, "no discount");
        assert_close(special_price(80.0, 100.0), 0.0, "full discount");
    }

    #[test]
    fn test_new_product_fills_derived_fields() {
        let input = CreateProduct {
            product_name: "Phone".to_string(),
            description: "A phone".to_string(),
            quantity: 10,
            price: 1000.0,
            discount: 10.0,
        };

        let record = NewProduct::from_request(7, input);

        assert_eq!(record.image, DEFAULT_PRODUCT_IMAGE);
        assert_eq!(record.category_id, 7);
        assert_close(record.special_price, 900.0, "derived special price");
    }

    #[test]
    fn test_category_name_must_be_five_characters() {
        let too_short = CreateCategory {
            category_name: "Tech".to_string(),
        };
        assert!(too_short.validate().is_err());

        let just_long_enough = CreateCategory {
            category_name: "Techs".to_string(),
        };
        assert!(just_long_enough.validate().is_ok());
    }

    #[test]
    fn test_blank_category_name_is_rejected() {
        let blank = CreateCategory {
            category_name: "     ".to_string(),
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_product_discount_range() {
        let over = CreateProduct {
            product_name: "Phone".to_string(),
            description: String::new(),
            quantity: 1,
            price: 100.0,
            discount: 101.0,
        };
        assert!(over.validate().is_err());

        let negative = CreateProduct {
            product_name: "Phone".to_string(),
            description: String::new(),
            quantity: 1,
            price: 100.0,
            discount: -1.0,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_category_serializes_camel_case() {
        let category = Category {
            category_id: 1,
            category_name: "Electronics".to_string(),
        };
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["categoryId"], 1);
        assert_eq!(json["categoryName"], "Electronics");
    }

    #[test]
    fn test_create_product_ignores_caller_special_price() {
        // specialPrice is not a field of the DTO, so a caller supplying it
        // has no effect on the derived value.
        let input: CreateProduct = serde_json::from_value(serde_json::json!({
            "productName": "Phone",
            "price": 1000.0,
            "discount": 10.0,
            "specialPrice": 1.0
        }))
        .unwrap();

        let record = NewProduct::from_request(1, input);
        assert_close(record.special_price, 900.0, "derived, not caller-supplied");
    }

    #[test]
    fn test_sort_field_tokens() {
        assert!(CategorySortField::parse("categoryName").is_ok());
        assert!(matches!(
            CategorySortField::parse("nope"),
            Err(crate::error::CatalogError::UnknownSortField(_))
        ));
        assert!(ProductSortField::parse("specialPrice").is_ok());
        assert!(ProductSortField::parse("image").is_err());
    }
}
