//! Repository trait definitions.

use async_trait::async_trait;
use catalog_core::{
    CatalogResult, Interface, NewProduct, NewUser, NormalizedListQuery, PagedResult, Product,
    ProductChanges, ProductId, User,
};

/// Product repository trait.
#[async_trait]
pub trait ProductRepository: Interface + Send + Sync {
    /// Finds a product by ID.
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    /// Returns one page of products matching the query's search term, in the
    /// query's sort order, together with the total number of matches.
    async fn find_page(&self, query: &NormalizedListQuery) -> CatalogResult<PagedResult<Product>>;

    /// Inserts a new product and returns it with its assigned identity.
    async fn create(&self, product: &NewProduct) -> CatalogResult<Product>;

    /// Applies changes to an existing product. Returns `None` if it does not exist.
    async fn update(&self, id: ProductId, changes: &ProductChanges) -> CatalogResult<Option<Product>>;

    /// Deletes a product. Returns `false` if it did not exist.
    async fn delete(&self, id: ProductId) -> CatalogResult<bool>;
}

/// User repository trait.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds a user by normalized email.
    async fn find_by_email(&self, email: &str) -> CatalogResult<Option<User>>;

    /// Checks if an email is already registered.
    async fn exists_by_email(&self, email: &str) -> CatalogResult<bool>;

    /// Inserts a new user. A duplicate email is a `Conflict`.
    async fn create(&self, user: &NewUser) -> CatalogResult<User>;
}
