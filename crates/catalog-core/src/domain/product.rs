//! Product entity.

use crate::ProductId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum length of a product name.
pub const PRODUCT_NAME_MAX_LEN: u64 = 200;

/// Maximum length of a product type.
pub const PRODUCT_TYPE_MAX_LEN: u64 = 100;

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Database-assigned identity.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Free-form product type, searchable alongside the name.
    pub product_type: String,

    /// Unit price, stored as `numeric(18,2)`.
    pub price: Decimal,

    /// Units in stock.
    pub quantity: i32,

    /// Whether the product is offered.
    pub is_active: bool,

    /// Creation timestamp.
    pub created_utc: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive substring match on name OR type.
    ///
    /// `term` must already be lower-cased.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term) || self.product_type.to_lowercase().contains(term)
    }
}

/// Fields required to insert a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub product_type: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// Fields applied by a product update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: String,
    pub product_type: String,
    pub price: Decimal,
    pub quantity: i32,
    /// Left unchanged when `None`.
    pub is_active: Option<bool>,
}
