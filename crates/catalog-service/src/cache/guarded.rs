//! Timeout and circuit breaker decorator for a cache store.

use super::CacheStore;
use async_trait::async_trait;
use catalog_config::CacheConfig;
use catalog_core::{CatalogError, CatalogResult};
use catalog_resilience::{with_timeout, CircuitBreaker, CircuitBreakerConfig, CircuitState};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Bounds every call to the wrapped store by a timeout and a circuit breaker.
///
/// A slow or unreachable cache then costs at most `op_timeout` per request
/// until the breaker opens, after which calls fail immediately. Timeouts and
/// an open breaker surface as [`CatalogError::CacheUnavailable`], which the
/// read path treats as a miss.
///
/// Prefix sweeps are the exception. Their cost grows with the whole keyspace,
/// so they run under `sweep_timeout` alone and their outcome is never
/// recorded by the breaker.
pub struct GuardedCacheStore {
    inner: Arc<dyn CacheStore>,
    breaker: CircuitBreaker,
    op_timeout: Duration,
    sweep_timeout: Duration,
}

impl GuardedCacheStore {
    #[must_use]
    pub fn new(
        inner: Arc<dyn CacheStore>,
        breaker: CircuitBreaker,
        op_timeout: Duration,
        sweep_timeout: Duration,
    ) -> Self {
        Self {
            inner,
            breaker,
            op_timeout,
            sweep_timeout,
        }
    }

    /// Builds the guard from the `cache` config section.
    #[must_use]
    pub fn from_config(inner: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        let breaker = CircuitBreaker::new(
            "cache",
            CircuitBreakerConfig {
                failure_threshold: config.breaker_failure_threshold,
                reset_timeout: config.breaker_reset_timeout(),
                ..Default::default()
            },
        );
        Self::new(inner, breaker, config.op_timeout(), config.sweep_timeout())
    }

    /// Current breaker state.
    #[must_use]
    pub fn breaker_state(&self) -> CircuitState {
        self.breaker.state()
    }

    async fn guarded<T, F, Fut>(&self, op: F) -> CatalogResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CatalogResult<T>>,
    {
        self.breaker
            .call(|| with_timeout(self.op_timeout, op))
            .await
            .map_err(unavailable)
    }
}

fn unavailable(e: CatalogError) -> CatalogError {
    match e {
        CatalogError::Timeout(msg) | CatalogError::CircuitBreakerOpen(msg) => {
            CatalogError::CacheUnavailable(msg)
        }
        other => other,
    }
}

#[async_trait]
impl CacheStore for GuardedCacheStore {
    async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>> {
        self.guarded(|| self.inner.get_raw(key)).await
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CatalogResult<()> {
        self.guarded(|| self.inner.set_raw(key, value, ttl)).await
    }

    async fn delete(&self, key: &str) -> CatalogResult<bool> {
        self.guarded(|| self.inner.delete(key)).await
    }

    async fn delete_by_prefix(&self, prefix: &str) -> CatalogResult<u64> {
        with_timeout(self.sweep_timeout, || self.inner.delete_by_prefix(prefix))
            .await
            .map_err(unavailable)
    }

    async fn ping(&self) -> CatalogResult<()> {
        self.guarded(|| self.inner.ping()).await
    }

    fn is_enabled(&self) -> bool {
        self.inner.is_enabled()
    }
}

impl std::fmt::Debug for GuardedCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedCacheStore")
            .field("breaker", &self.breaker.state())
            .field("op_timeout", &self.op_timeout)
            .field("sweep_timeout", &self.sweep_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{invalidate_list_caches, InMemoryCacheStore, MockCacheStore};

    fn guard_with_sweep(
        inner: Arc<dyn CacheStore>,
        threshold: u32,
        sweep_timeout: Duration,
    ) -> GuardedCacheStore {
        GuardedCacheStore::new(
            inner,
            CircuitBreaker::new(
                "cache",
                CircuitBreakerConfig {
                    failure_threshold: threshold,
                    reset_timeout: Duration::from_secs(60),
                    ..Default::default()
                },
            ),
            Duration::from_millis(50),
            sweep_timeout,
        )
    }

    fn guard(inner: Arc<dyn CacheStore>, threshold: u32) -> GuardedCacheStore {
        guard_with_sweep(inner, threshold, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_passes_through_when_healthy() {
        let store = guard(Arc::new(InMemoryCacheStore::new()), 3);
        store.set_raw("k", "v", Duration::from_secs(5)).await.unwrap();
        assert_eq!(store.get_raw("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.breaker_state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_open_breaker_short_circuits() {
        let mut inner = MockCacheStore::new();
        inner
            .expect_get_raw()
            .times(2)
            .returning(|_| Err(CatalogError::cache_unavailable("connection refused")));
        let store = guard(Arc::new(inner), 2);

        for _ in 0..2 {
            assert!(store.get_raw("k").await.is_err());
        }
        assert_eq!(store.breaker_state(), CircuitState::Open);

        // Third call never reaches the mock (times(2) above).
        let result = store.get_raw("k").await;
        assert!(matches!(result, Err(CatalogError::CacheUnavailable(_))));
    }

    struct SlowStore;

    #[async_trait]
    impl CacheStore for SlowStore {
        async fn get_raw(&self, _key: &str) -> CatalogResult<Option<String>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }
        async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> CatalogResult<()> {
            Ok(())
        }
        async fn delete(&self, _key: &str) -> CatalogResult<bool> {
            Ok(false)
        }
        async fn delete_by_prefix(&self, _prefix: &str) -> CatalogResult<u64> {
            Ok(0)
        }
        async fn ping(&self) -> CatalogResult<()> {
            Ok(())
        }
        fn is_enabled(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_timeout_reports_unavailable() {
        let store = guard(Arc::new(SlowStore), 5);
        let result = store.get_raw("k").await;
        assert!(matches!(result, Err(CatalogError::CacheUnavailable(_))));
    }

    /// Walks the keyspace in many small round trips before delegating, like a
    /// `SCAN` loop over a large Redis.
    struct SlowSweepStore {
        inner: InMemoryCacheStore,
        round_trips: u32,
    }

    #[async_trait]
    impl CacheStore for SlowSweepStore {
        async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>> {
            self.inner.get_raw(key).await
        }
        async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CatalogResult<()> {
            self.inner.set_raw(key, value, ttl).await
        }
        async fn delete(&self, key: &str) -> CatalogResult<bool> {
            self.inner.delete(key).await
        }
        async fn delete_by_prefix(&self, prefix: &str) -> CatalogResult<u64> {
            for _ in 0..self.round_trips {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            self.inner.delete_by_prefix(prefix).await
        }
        async fn ping(&self) -> CatalogResult<()> {
            Ok(())
        }
        fn is_enabled(&self) -> bool {
            true
        }
    }

    const LIST_KEY: &str = "products:list:p1:s20:q0::odefault";

    #[tokio::test(start_paused = true)]
    async fn test_long_sweep_outlives_op_timeout() {
        let inner = Arc::new(SlowSweepStore {
            inner: InMemoryCacheStore::new(),
            round_trips: 300,
        });
        let store = guard(inner.clone(), 5);

        for _ in 0..5 {
            store.set_raw(LIST_KEY, "page", Duration::from_secs(60)).await.unwrap();
            invalidate_list_caches(&store, "products").await;
            assert!(!inner.inner.contains_key(LIST_KEY));
        }

        assert_eq!(store.breaker_state(), CircuitState::Closed);
        assert_eq!(store.get_raw(LIST_KEY).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_timeout_does_not_trip_breaker() {
        let inner = Arc::new(SlowSweepStore {
            inner: InMemoryCacheStore::new(),
            round_trips: 300,
        });
        let store = guard_with_sweep(inner, 2, Duration::from_millis(100));

        for _ in 0..3 {
            let result = store.delete_by_prefix("products:list:").await;
            assert!(matches!(result, Err(CatalogError::CacheUnavailable(_))));
        }

        assert_eq!(store.breaker_state(), CircuitState::Closed);
        store.set_raw(LIST_KEY, "page", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get_raw(LIST_KEY).await.unwrap().as_deref(), Some("page"));
    }
}
