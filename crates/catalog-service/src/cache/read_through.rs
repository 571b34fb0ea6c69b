//! Read-through caching of paged list queries.

use super::cache_keys::list_key;
use super::{CacheExt, CacheStore};
use catalog_core::{CatalogResult, ListQuery, NormalizedListQuery, PagedResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// The cached form of a list page.
pub type CachedPage<T> = PagedResult<T>;

/// Cache-aside access for list views.
#[derive(Clone)]
pub struct ListCache {
    store: Arc<dyn CacheStore>,
}

impl ListCache {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Returns the page for `query`, from cache when possible.
    ///
    /// On a miss, or when the cache cannot be reached, `fetcher` runs with the
    /// normalized query and its result is written back with `ttl`. Write-back
    /// failures are logged and ignored. Errors from `fetcher` are returned
    /// unchanged and nothing is cached.
    pub async fn get_page<T, F, Fut>(
        &self,
        namespace: &str,
        query: &ListQuery,
        ttl: Duration,
        fetcher: F,
    ) -> CatalogResult<CachedPage<T>>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce(NormalizedListQuery) -> Fut,
        Fut: Future<Output = CatalogResult<CachedPage<T>>>,
    {
        let normalized = query.normalize();
        let key = list_key(namespace, &normalized);

        match self.store.get::<CachedPage<T>>(&key).await {
            Ok(Some(page)) => {
                debug!("List cache hit: {}", key);
                return Ok(page);
            }
            Ok(None) => debug!("List cache miss: {}", key),
            Err(e) => warn!("List cache read failed for '{}', querying store: {}", key, e),
        }

        let page = fetcher(normalized).await?;

        if let Err(e) = self.store.set(&key, &page, ttl).await {
            warn!("List cache populate failed for '{}': {}", key, e);
        }
        Ok(page)
    }
}

impl std::fmt::Debug for ListCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListCache").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::cache_keys::{derive_key, PRODUCTS_NAMESPACE};
    use crate::cache::{InMemoryCacheStore, MockCacheStore};
    use catalog_core::CatalogError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(60);

    struct CountingFetcher {
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        async fn fetch(&self, query: NormalizedListQuery) -> CatalogResult<CachedPage<String>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(PagedResult::new(vec![format!("call-{n}")], 1, &query))
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let store = Arc::new(InMemoryCacheStore::new());
        let cache = ListCache::new(store.clone());
        let fetcher = CountingFetcher::new();
        let query = ListQuery::new(2, 10).with_search("widget").with_sort("price_asc");

        let first = cache
            .get_page(PRODUCTS_NAMESPACE, &query, TTL, |q| fetcher.fetch(q))
            .await
            .unwrap();
        let second = cache
            .get_page(PRODUCTS_NAMESPACE, &query, TTL, |q| fetcher.fetch(q))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls(), 1);
        assert!(store.contains_key(&derive_key(PRODUCTS_NAMESPACE, &query)));
    }

    #[tokio::test]
    async fn test_equivalent_queries_share_an_entry() {
        let cache = ListCache::new(Arc::new(InMemoryCacheStore::new()));
        let fetcher = CountingFetcher::new();

        let plain = ListQuery::new(1, 20);
        let spelled_out = ListQuery::new(1, 20).with_search("").with_sort("default");

        cache
            .get_page(PRODUCTS_NAMESPACE, &plain, TTL, |q| fetcher.fetch(q))
            .await
            .unwrap();
        cache
            .get_page(PRODUCTS_NAMESPACE, &spelled_out, TTL, |q| fetcher.fetch(q))
            .await
            .unwrap();

        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetcher_receives_normalized_query() {
        let cache = ListCache::new(Arc::new(InMemoryCacheStore::new()));
        let query = ListQuery::new(0, 0).with_search("  WIDGET ").with_sort("nope");

        let page = cache
            .get_page(PRODUCTS_NAMESPACE, &query, TTL, |q| async move {
                assert_eq!(q.page(), 1);
                assert_eq!(q.page_size(), 20);
                assert_eq!(q.search(), Some("widget"));
                Ok(PagedResult::<String>::empty(&q))
            })
            .await
            .unwrap();
        assert_eq!(page.page, 1);
    }

    #[tokio::test]
    async fn test_unreachable_cache_falls_back_to_fetcher() {
        let mut store = MockCacheStore::new();
        store
            .expect_get_raw()
            .returning(|_| Err(CatalogError::cache_unavailable("connection refused")));
        store
            .expect_set_raw()
            .returning(|_, _, _| Err(CatalogError::cache_unavailable("connection refused")));
        let cache = ListCache::new(Arc::new(store));
        let fetcher = CountingFetcher::new();

        let page = cache
            .get_page(PRODUCTS_NAMESPACE, &ListQuery::default(), TTL, |q| fetcher.fetch(q))
            .await
            .unwrap();

        assert_eq!(page.items, vec!["call-1".to_string()]);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_is_returned_and_not_cached() {
        let store = Arc::new(InMemoryCacheStore::new());
        let cache = ListCache::new(store.clone());

        let result = cache
            .get_page(PRODUCTS_NAMESPACE, &ListQuery::default(), TTL, |_| async {
                Err::<CachedPage<String>, _>(CatalogError::Database("connection reset".into()))
            })
            .await;

        assert!(matches!(result, Err(CatalogError::Database(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_populate_uses_ttl() {
        let mut store = MockCacheStore::new();
        store.expect_get_raw().returning(|_| Ok(None));
        store
            .expect_set_raw()
            .withf(|key, value, ttl| {
                key == "products:list:p1:s20:q0::odefault"
                    && value.starts_with(r#"{"v":1,"#)
                    && *ttl == Duration::from_secs(60)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        let cache = ListCache::new(Arc::new(store));

        cache
            .get_page(PRODUCTS_NAMESPACE, &ListQuery::default(), TTL, |q| async move {
                Ok(PagedResult::<String>::empty(&q))
            })
            .await
            .unwrap();
    }
}
