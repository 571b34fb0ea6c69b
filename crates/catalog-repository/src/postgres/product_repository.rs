//! PostgreSQL product repository implementation.

use super::escape_like;
use crate::{traits::ProductRepository, DatabasePool};
use async_trait::async_trait;
use catalog_core::{
    CatalogResult, NewProduct, NormalizedListQuery, PagedResult, Product, ProductChanges, ProductId,
    SortKey,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

const PRODUCT_COLUMNS: &str = "id, name, product_type, price, quantity, is_active, created_utc";

/// PostgreSQL product repository implementation.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: Arc<DatabasePool>,
}

impl PgProductRepository {
    /// Creates a new PostgreSQL product repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a product.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    product_type: String,
    price: Decimal,
    quantity: i32,
    is_active: bool,
    created_utc: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId(row.id),
            name: row.name,
            product_type: row.product_type,
            price: row.price,
            quantity: row.quantity,
            is_active: row.is_active,
            created_utc: row.created_utc,
        }
    }
}

/// `ORDER BY` clause for a sort key. Identity breaks price ties so paging is stable.
const fn order_by(sort: SortKey) -> &'static str {
    match sort {
        SortKey::Default => "id DESC",
        SortKey::PriceAsc => "price ASC, id ASC",
        SortKey::PriceDesc => "price DESC, id DESC",
    }
}

const SEARCH_FILTER: &str =
    r"($1::text IS NULL OR LOWER(name) LIKE $1 ESCAPE '\' OR LOWER(product_type) LIKE $1 ESCAPE '\')";

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        debug!("Finding product by id: {}", id);

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Product::from))
    }

    async fn find_page(&self, query: &NormalizedListQuery) -> CatalogResult<PagedResult<Product>> {
        debug!(
            page = query.page(),
            page_size = query.page_size(),
            search = ?query.search(),
            sort = %query.sort(),
            "Querying product page"
        );

        let pattern = query.search().map(|term| format!("%{}%", escape_like(term)));
        let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM products WHERE {SEARCH_FILTER}"
        ))
        .bind(pattern.as_deref())
        .fetch_one(self.pool.inner())
        .await?;

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE {SEARCH_FILTER} ORDER BY {} LIMIT $2 OFFSET $3",
            order_by(query.sort())
        ))
        .bind(pattern.as_deref())
        .bind(i64::from(query.limit()))
        .bind(offset)
        .fetch_all(self.pool.inner())
        .await?;

        let items = rows.into_iter().map(Product::from).collect();
        Ok(PagedResult::new(items, u64::try_from(total).unwrap_or(0), query))
    }

    async fn create(&self, product: &NewProduct) -> CatalogResult<Product> {
        debug!("Creating product: {}", product.name);

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (name, product_type, price, quantity, is_active, created_utc) \
             VALUES ($1, $2, $3, $4, TRUE, NOW()) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.name)
        .bind(&product.product_type)
        .bind(product.price)
        .bind(product.quantity)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: ProductId, changes: &ProductChanges) -> CatalogResult<Option<Product>> {
        debug!("Updating product: {}", id);

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET name = $2, product_type = $3, price = $4, quantity = $5, \
             is_active = COALESCE($6, is_active) WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.into_inner())
        .bind(&changes.name)
        .bind(&changes.product_type)
        .bind(changes.price)
        .bind(changes.quantity)
        .bind(changes.is_active)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Product::from))
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
        debug!("Deleting product: {}", id);

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for PgProductRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgProductRepository").finish_non_exhaustive()
    }
}
