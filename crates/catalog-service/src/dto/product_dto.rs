//! Product DTOs.

use catalog_core::rules::{non_negative, not_blank};
use catalog_core::{NewProduct, Product, ProductChanges, ProductId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(max = 200, message = "Name cannot exceed 200 characters")
    )]
    pub name: String,

    #[serde(rename = "type")]
    #[validate(
        custom(function = "not_blank", message = "Type is required"),
        length(max = 100, message = "Type cannot exceed 100 characters")
    )]
    pub product_type: String,

    #[schema(value_type = String, example = "19.99")]
    #[validate(custom(function = "non_negative", message = "Price cannot be negative"))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,
}

impl CreateProductRequest {
    /// Converts into an insertable product with trimmed text fields.
    #[must_use]
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            name: self.name.trim().to_string(),
            product_type: self.product_type.trim().to_string(),
            price: self.price,
            quantity: self.quantity,
        }
    }
}

/// Request to replace a product's fields.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(max = 200, message = "Name cannot exceed 200 characters")
    )]
    pub name: String,

    #[serde(rename = "type")]
    #[validate(
        custom(function = "not_blank", message = "Type is required"),
        length(max = 100, message = "Type cannot exceed 100 characters")
    )]
    pub product_type: String,

    #[schema(value_type = String, example = "19.99")]
    #[validate(custom(function = "non_negative", message = "Price cannot be negative"))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,

    /// Leaves the flag unchanged when omitted.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateProductRequest {
    #[must_use]
    pub fn into_changes(self) -> ProductChanges {
        ProductChanges {
            name: self.name.trim().to_string(),
            product_type: self.product_type.trim().to_string(),
            price: self.price,
            quantity: self.quantity,
            is_active: self.is_active,
        }
    }
}

/// Full product representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub quantity: i32,
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            product_type: product.product_type,
            price: product.price,
            quantity: product.quantity,
            is_active: product.is_active,
            created_utc: product.created_utc,
        }
    }
}

/// Product row in a list page. This is the shape stored in the list cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListItem {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub quantity: i32,
    pub created_utc: DateTime<Utc>,
}

impl From<Product> for ProductListItem {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            product_type: product.product_type,
            price: product.price,
            quantity: product.quantity,
            created_utc: product.created_utc,
        }
    }
}
