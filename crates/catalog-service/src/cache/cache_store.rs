//! Cache store abstraction.

use async_trait::async_trait;
use catalog_core::{CatalogError, CatalogResult, HealthCheck, HealthStatus, Interface};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Version stamped on every cached payload. Bump when a cached type changes
/// shape; entries written under another version read as misses.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// Key/value store holding serialized payloads with a time-to-live.
///
/// Values are opaque strings so the trait stays object-safe; [`CacheExt`]
/// adds the typed layer on top.
#[async_trait]
pub trait CacheStore: Interface + Send + Sync {
    /// Returns the stored value, or `None` if absent or expired.
    async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous entry, expiring after `ttl`.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CatalogResult<()>;

    /// Removes one key. Returns `true` if it existed.
    async fn delete(&self, key: &str) -> CatalogResult<bool>;

    /// Removes every key starting with `prefix` and returns how many were removed.
    ///
    /// Not atomic: keys written while the sweep runs may survive it.
    async fn delete_by_prefix(&self, prefix: &str) -> CatalogResult<u64>;

    /// Round-trips to the backing store.
    async fn ping(&self) -> CatalogResult<()>;

    /// Returns false when caching is switched off.
    fn is_enabled(&self) -> bool;
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    v: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    v: u32,
    data: serde_json::Value,
}

fn encode<T: Serialize>(value: &T) -> CatalogResult<String> {
    Ok(serde_json::to_string(&EnvelopeOut {
        v: CACHE_SCHEMA_VERSION,
        data: value,
    })?)
}

fn decode<T: DeserializeOwned>(raw: &str) -> CatalogResult<T> {
    let envelope: EnvelopeIn = serde_json::from_str(raw)?;
    if envelope.v != CACHE_SCHEMA_VERSION {
        return Err(CatalogError::Serialization(format!(
            "schema version {} (expected {CACHE_SCHEMA_VERSION})",
            envelope.v
        )));
    }
    Ok(serde_json::from_value(envelope.data)?)
}

/// Typed access on top of [`CacheStore`].
#[async_trait]
pub trait CacheExt: CacheStore {
    /// Reads and decodes a value.
    ///
    /// An entry that cannot be decoded, including one written under another
    /// schema version, is reported as `Ok(None)`.
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> CatalogResult<Option<T>> {
        let Some(raw) = self.get_raw(key).await? else {
            return Ok(None);
        };
        match decode(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Discarding undecodable cache entry '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    /// Encodes and stores a value.
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> CatalogResult<()> {
        let raw = encode(value)?;
        self.set_raw(key, &raw, ttl).await
    }
}

impl<T: CacheStore + ?Sized> CacheExt for T {}

/// Health check reporting cache problems as degraded, never unhealthy.
pub struct CacheHealthCheck {
    store: Arc<dyn CacheStore>,
}

impl CacheHealthCheck {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl HealthCheck for CacheHealthCheck {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        if !self.store.is_enabled() {
            return HealthStatus::Degraded("cache disabled".to_string());
        }
        match self.store.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Degraded(e.to_string()),
        }
    }
}

#[cfg(test)]
mockall::mock! {
    pub CacheStore {}

    #[async_trait]
    impl CacheStore for CacheStore {
        async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>>;
        async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CatalogResult<()>;
        async fn delete(&self, key: &str) -> CatalogResult<bool>;
        async fn delete_by_prefix(&self, prefix: &str) -> CatalogResult<u64>;
        async fn ping(&self) -> CatalogResult<()>;
        fn is_enabled(&self) -> bool;
    }
}
