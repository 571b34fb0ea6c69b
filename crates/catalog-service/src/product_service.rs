//! Product service trait definition.

use crate::dto::{CreateProductRequest, ProductListItem, ProductResponse, UpdateProductRequest};
use async_trait::async_trait;
use catalog_core::{CatalogResult, Interface, ListQuery, PagedResult, ProductId};

/// Product catalog use cases.
#[async_trait]
pub trait ProductService: Interface + Send + Sync {
    /// Lists products. Pages are served from the list cache when present.
    async fn list(&self, query: ListQuery) -> CatalogResult<PagedResult<ProductListItem>>;

    /// Gets a product by ID. Always read from the repository.
    async fn get(&self, id: ProductId) -> CatalogResult<ProductResponse>;

    /// Creates a product and invalidates cached lists.
    async fn create(&self, request: CreateProductRequest) -> CatalogResult<ProductResponse>;

    /// Updates a product and invalidates cached lists.
    async fn update(&self, id: ProductId, request: UpdateProductRequest) -> CatalogResult<ProductResponse>;

    /// Deletes a product and invalidates cached lists.
    async fn delete(&self, id: ProductId) -> CatalogResult<()>;
}
