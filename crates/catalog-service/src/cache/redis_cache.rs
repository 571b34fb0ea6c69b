//! Redis-based cache store.

use super::CacheStore;
use async_trait::async_trait;
use catalog_config::RedisConfig;
use catalog_core::{CatalogError, CatalogResult};
use deadpool_redis::{redis, redis::AsyncCommands, Pool, PoolConfig, Runtime};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Keys fetched per `SCAN` round trip during prefix deletes.
const SCAN_BATCH: usize = 200;

/// Redis-based cache store.
pub struct RedisCacheStore {
    /// `None` when Redis is switched off; every read is then a miss.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheStore {
    /// Creates a store backed by `pool`.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Creates a store that caches nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    async fn get_conn(&self) -> CatalogResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                CatalogError::cache_unavailable(format!("Failed to get Redis connection: {e}"))
            }),
            None => Err(CatalogError::cache_unavailable("Cache is disabled")),
        }
    }
}

/// Builds the Redis pool, or `None` when Redis is disabled.
///
/// Pool creation does not connect; an unreachable server surfaces on first use.
pub fn create_redis_pool(config: &RedisConfig) -> CatalogResult<Option<Arc<Pool>>> {
    if !config.enabled {
        info!("Redis disabled, list caching is off");
        return Ok(None);
    }
    let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
    redis_cfg.pool = Some(PoolConfig::new(config.pool_size));
    let pool = redis_cfg
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| CatalogError::Configuration(format!("Failed to create Redis pool: {e}")))?;
    Ok(Some(Arc::new(pool)))
}

/// Escapes glob metacharacters so `prefix` is matched literally by `SCAN MATCH`.
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn unavailable(action: &str, e: &redis::RedisError) -> CatalogError {
    CatalogError::cache_unavailable(format!("Failed to {action}: {e}"))
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| unavailable(&format!("get key '{key}'"), &e))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CatalogResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);

        // Value and expiry in one command: a key never exists without a TTL.
        let (): () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(ttl_ms)
            .query_async(&mut conn)
            .await
            .map_err(|e| unavailable(&format!("set key '{key}'"), &e))?;

        debug!("Cached key '{}' with TTL {}ms", key, ttl_ms);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CatalogResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| unavailable(&format!("delete key '{key}'"), &e))?;
        Ok(deleted > 0)
    }

    async fn delete_by_prefix(&self, prefix: &str) -> CatalogResult<u64> {
        if !self.is_enabled() {
            return Ok(0);
        }

        let mut conn = self.get_conn().await?;
        let pattern = format!("{}*", escape_glob(prefix));
        let mut cursor: u64 = 0;
        let mut removed: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| unavailable("scan keys", &e))?;

            if !keys.is_empty() {
                let deleted: u64 = conn
                    .del(&keys)
                    .await
                    .map_err(|e| unavailable("delete keys", &e))?;
                removed += deleted;
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        debug!("Deleted {} keys with prefix '{}'", removed, prefix);
        Ok(removed)
    }

    async fn ping(&self) -> CatalogResult<()> {
        let mut conn = self.get_conn().await?;
        let _pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| unavailable("ping", &e))?;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }
}

impl std::fmt::Debug for RedisCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheStore")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_glob() {
        assert_eq!(escape_glob("products:list:"), "products:list:");
        assert_eq!(escape_glob("a*b?[c]\\"), "a\\*b\\?\\[c\\]\\\\");
    }

    #[tokio::test]
    async fn test_disabled_store_is_a_permanent_miss() {
        let store = RedisCacheStore::disabled();
        assert!(!store.is_enabled());
        store.set_raw("k", "v", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get_raw("k").await.unwrap(), None);
        assert_eq!(store.delete_by_prefix("k").await.unwrap(), 0);
        assert!(!store.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_disabled_store_ping_reports_unavailable() {
        let store = RedisCacheStore::disabled();
        assert!(matches!(store.ping().await, Err(CatalogError::CacheUnavailable(_))));
    }

    #[test]
    fn test_pool_not_created_when_disabled() {
        let config = RedisConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(create_redis_pool(&config).unwrap().is_none());
    }

    #[test]
    fn test_pool_created_lazily() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            pool_size: 4,
            enabled: true,
        };
        let pool = create_redis_pool(&config).unwrap().unwrap();
        assert_eq!(pool.status().max_size, 4);
    }
}
