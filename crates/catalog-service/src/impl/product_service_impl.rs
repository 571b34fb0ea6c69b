//! Product service implementation.

use crate::cache::cache_keys::PRODUCTS_NAMESPACE;
use crate::cache::{invalidate_list_caches, ListCache};
use crate::dto::{CreateProductRequest, ProductListItem, ProductResponse, UpdateProductRequest};
use crate::product_service::ProductService;
use async_trait::async_trait;
use catalog_core::{CatalogError, CatalogResult, ListQuery, PagedResult, ProductId, ValidateExt};
use catalog_repository::ProductRepository;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Product service backed by a repository and the list cache.
pub struct ProductServiceImpl {
    repository: Arc<dyn ProductRepository>,
    list_cache: ListCache,
    list_ttl: Duration,
}

impl ProductServiceImpl {
    /// Creates a new product service.
    #[must_use]
    pub fn new(repository: Arc<dyn ProductRepository>, list_cache: ListCache, list_ttl: Duration) -> Self {
        Self {
            repository,
            list_cache,
            list_ttl,
        }
    }

    async fn invalidate_lists(&self) {
        invalidate_list_caches(self.list_cache.store().as_ref(), PRODUCTS_NAMESPACE).await;
    }
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    async fn list(&self, query: ListQuery) -> CatalogResult<PagedResult<ProductListItem>> {
        let repository = &self.repository;
        self.list_cache
            .get_page(PRODUCTS_NAMESPACE, &query, self.list_ttl, |normalized| async move {
                debug!(
                    "Listing products, page: {}, size: {}, sort: {}",
                    normalized.page(),
                    normalized.page_size(),
                    normalized.sort()
                );
                let page = repository.find_page(&normalized).await?;
                Ok(page.map(ProductListItem::from))
            })
            .await
    }

    async fn get(&self, id: ProductId) -> CatalogResult<ProductResponse> {
        debug!("Getting product: {}", id);

        let product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", id))?;

        Ok(ProductResponse::from(product))
    }

    async fn create(&self, request: CreateProductRequest) -> CatalogResult<ProductResponse> {
        request.validate_request()?;

        let product = self.repository.create(&request.into_new_product()).await?;
        self.invalidate_lists().await;

        info!("Product created: {}", product.id);
        Ok(ProductResponse::from(product))
    }

    async fn update(&self, id: ProductId, request: UpdateProductRequest) -> CatalogResult<ProductResponse> {
        request.validate_request()?;

        let product = self
            .repository
            .update(id, &request.into_changes())
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", id))?;
        self.invalidate_lists().await;

        info!("Product updated: {}", id);
        Ok(ProductResponse::from(product))
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CatalogError::not_found("Product", id));
        }
        self.invalidate_lists().await;

        info!("Product deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for ProductServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductServiceImpl")
            .field("list_ttl", &self.list_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, InMemoryCacheStore, MockCacheStore};
    use async_trait::async_trait;
    use catalog_core::{
        NewProduct, NormalizedListQuery, Product, ProductChanges,
    };
    use catalog_repository::InMemoryProductRepository;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(60);

    /// Counts `find_page` calls so tests can tell hits from misses.
    #[derive(Default)]
    struct CountingRepository {
        inner: InMemoryProductRepository,
        page_queries: AtomicUsize,
    }

    impl CountingRepository {
        fn page_queries(&self) -> usize {
            self.page_queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProductRepository for CountingRepository {
        async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
            self.inner.find_by_id(id).await
        }
        async fn find_page(&self, query: &NormalizedListQuery) -> CatalogResult<PagedResult<Product>> {
            self.page_queries.fetch_add(1, Ordering::SeqCst);
            self.inner.find_page(query).await
        }
        async fn create(&self, product: &NewProduct) -> CatalogResult<Product> {
            self.inner.create(product).await
        }
        async fn update(&self, id: ProductId, changes: &ProductChanges) -> CatalogResult<Option<Product>> {
            self.inner.update(id, changes).await
        }
        async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
            self.inner.delete(id).await
        }
    }

    struct Fixture {
        service: ProductServiceImpl,
        repository: Arc<CountingRepository>,
        store: Arc<InMemoryCacheStore>,
    }

    fn fixture() -> Fixture {
        let repository = Arc::new(CountingRepository::default());
        let store = Arc::new(InMemoryCacheStore::new());
        let service = ProductServiceImpl::new(repository.clone(), ListCache::new(store.clone()), TTL);
        Fixture {
            service,
            repository,
            store,
        }
    }

    fn create_request(name: &str, price: i64) -> CreateProductRequest {
        CreateProductRequest {
            name: name.to_string(),
            product_type: "tools".to_string(),
            price: Decimal::new(price, 2),
            quantity: 1,
        }
    }

    fn update_request(name: &str) -> UpdateProductRequest {
        UpdateProductRequest {
            name: name.to_string(),
            product_type: "tools".to_string(),
            price: Decimal::new(500, 2),
            quantity: 2,
            is_active: Some(false),
        }
    }

    #[tokio::test]
    async fn test_list_is_cached_until_a_write() {
        let f = fixture();
        f.service.create(create_request("Widget", 1000)).await.unwrap();

        let first = f.service.list(ListQuery::default()).await.unwrap();
        let second = f.service.list(ListQuery::default()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(f.repository.page_queries(), 1);
        assert_eq!(f.store.len(), 1);

        f.service.create(create_request("Gadget", 500)).await.unwrap();
        assert!(f.store.is_empty());

        let third = f.service.list(ListQuery::default()).await.unwrap();
        assert_eq!(third.total_count, 2);
        assert_eq!(third.items[0].name, "Gadget");
        assert_eq!(f.repository.page_queries(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_invalidate_lists() {
        let f = fixture();
        let created = f.service.create(create_request("Widget", 1000)).await.unwrap();

        f.service.list(ListQuery::default()).await.unwrap();
        let updated = f.service.update(created.id, update_request(" Renamed ")).await.unwrap();
        assert_eq!(updated.name, "Renamed");
        assert!(!updated.is_active);
        assert!(f.store.is_empty());

        let page = f.service.list(ListQuery::default()).await.unwrap();
        assert_eq!(page.items[0].name, "Renamed");

        f.service.delete(created.id).await.unwrap();
        assert!(f.store.is_empty());
        assert!(f.service.list(ListQuery::default()).await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let f = fixture();
        let id = ProductId(99);

        assert!(matches!(f.service.get(id).await, Err(CatalogError::NotFound { .. })));
        assert!(matches!(
            f.service.update(id, update_request("x")).await,
            Err(CatalogError::NotFound { .. })
        ));
        assert!(matches!(f.service.delete(id).await, Err(CatalogError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_invalid_create_is_rejected_before_the_repository() {
        let f = fixture();
        let mut request = create_request("  ", 100);
        request.quantity = -1;

        let result = f.service.create(request).await;
        assert!(matches!(result, Err(CatalogError::ValidationErrors(_))));
        assert!(f.repository.inner.is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_does_not_invalidate() {
        let f = fixture();
        f.service.list(ListQuery::default()).await.unwrap();

        let _ = f.service.update(ProductId(5), update_request("x")).await;
        let _ = f.service.delete(ProductId(5)).await;
        assert_eq!(f.store.len(), 1);
    }

    #[tokio::test]
    async fn test_writes_succeed_when_cache_is_down() {
        let mut store = MockCacheStore::new();
        store
            .expect_delete_by_prefix()
            .returning(|_| Err(CatalogError::cache_unavailable("connection refused")));
        store
            .expect_get_raw()
            .returning(|_| Err(CatalogError::cache_unavailable("connection refused")));
        store
            .expect_set_raw()
            .returning(|_, _, _| Err(CatalogError::cache_unavailable("connection refused")));
        let store: Arc<dyn CacheStore> = Arc::new(store);
        let service = ProductServiceImpl::new(
            Arc::new(InMemoryProductRepository::new()),
            ListCache::new(store),
            TTL,
        );

        let created = service.create(create_request("Widget", 1000)).await.unwrap();
        let page = service.list(ListQuery::default()).await.unwrap();
        assert_eq!(page.items[0].id, created.id);
        service.delete(created.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_applies_search_sort_and_paging() {
        let f = fixture();
        for (name, price) in [("Red widget", 300), ("Blue widget", 100), ("Gadget", 200)] {
            f.service.create(create_request(name, price)).await.unwrap();
        }

        let page = f
            .service
            .list(ListQuery::new(1, 1).with_search(" WIDGET ").with_sort("price_asc"))
            .await
            .unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Blue widget");
    }
}
