//! In-memory repositories.
//!
//! Used by service and HTTP tests and for running the server without a
//! database. The list semantics match the PostgreSQL implementation exactly.

use crate::traits::{ProductRepository, UserRepository};
use async_trait::async_trait;
use catalog_core::{
    CatalogError, CatalogResult, NewProduct, NewUser, NormalizedListQuery, PagedResult, Product,
    ProductChanges, ProductId, SortKey, User, UserId,
};
use chrono::Utc;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// In-memory product repository.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    inner: RwLock<ProductTable>,
}

#[derive(Debug, Default)]
struct ProductTable {
    rows: BTreeMap<ProductId, Product>,
    next_id: i64,
}

impl InMemoryProductRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    /// Returns true if no products are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().rows.is_empty()
    }
}

fn compare(sort: SortKey, a: &Product, b: &Product) -> Ordering {
    match sort {
        SortKey::Default => b.id.cmp(&a.id),
        SortKey::PriceAsc => a.price.cmp(&b.price).then(a.id.cmp(&b.id)),
        SortKey::PriceDesc => b.price.cmp(&a.price).then(b.id.cmp(&a.id)),
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        Ok(self.inner.read().rows.get(&id).cloned())
    }

    async fn find_page(&self, query: &NormalizedListQuery) -> CatalogResult<PagedResult<Product>> {
        let mut matches: Vec<Product> = self
            .inner
            .read()
            .rows
            .values()
            .filter(|p| query.search().map_or(true, |term| p.matches_search(term)))
            .cloned()
            .collect();
        matches.sort_by(|a, b| compare(query.sort(), a, b));

        let total = matches.len() as u64;
        let skip = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let items = matches
            .into_iter()
            .skip(skip)
            .take(query.limit() as usize)
            .collect();

        Ok(PagedResult::new(items, total, query))
    }

    async fn create(&self, product: &NewProduct) -> CatalogResult<Product> {
        let mut table = self.inner.write();
        table.next_id += 1;
        let created = Product {
            id: ProductId(table.next_id),
            name: product.name.clone(),
            product_type: product.product_type.clone(),
            price: product.price,
            quantity: product.quantity,
            is_active: true,
            created_utc: Utc::now(),
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: ProductId, changes: &ProductChanges) -> CatalogResult<Option<Product>> {
        let mut table = self.inner.write();
        let Some(product) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        product.name.clone_from(&changes.name);
        product.product_type.clone_from(&changes.product_type);
        product.price = changes.price;
        product.quantity = changes.quantity;
        if let Some(is_active) = changes.is_active {
            product.is_active = is_active;
        }
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
        Ok(self.inner.write().rows.remove(&id).is_some())
    }
}

/// In-memory user repository.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<UserTable>,
}

#[derive(Debug, Default)]
struct UserTable {
    rows: BTreeMap<UserId, User>,
    next_id: i64,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> CatalogResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .rows
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> CatalogResult<bool> {
        Ok(self.inner.read().rows.values().any(|u| u.email == email))
    }

    async fn create(&self, user: &NewUser) -> CatalogResult<User> {
        let mut table = self.inner.write();
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(CatalogError::conflict("Email is already registered"));
        }
        table.next_id += 1;
        let created = User {
            id: UserId(table.next_id),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            full_name: user.full_name.clone(),
            created_utc: Utc::now(),
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }
}
