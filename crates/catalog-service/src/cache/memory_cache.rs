//! In-process cache store.

use super::CacheStore;
use async_trait::async_trait;
use catalog_core::CatalogResult;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// `HashMap`-backed cache store with per-entry expiry.
///
/// Expired entries are dropped lazily on read and during prefix sweeps.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCacheStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.read().values().filter(|e| e.expires_at > now).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `key` holds a live entry.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .read()
            .get(key)
            .is_some_and(|e| e.expires_at > Instant::now())
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CatalogResult<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CatalogResult<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> CatalogResult<u64> {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.write().retain(|key, entry| {
            if !key.starts_with(prefix) {
                return true;
            }
            if entry.expires_at > now {
                removed += 1;
            }
            false
        });
        Ok(removed)
    }

    async fn ping(&self) -> CatalogResult<()> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_set_get_overwrite() {
        let store = InMemoryCacheStore::new();
        store.set_raw("a", "1", TTL).await.unwrap();
        store.set_raw("a", "2", TTL).await.unwrap();
        assert_eq!(store.get_raw("a").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.get_raw("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let store = InMemoryCacheStore::new();
        store.set_raw("a", "1", Duration::from_millis(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.get_raw("a").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_prefix_only_touches_prefix() {
        let store = InMemoryCacheStore::new();
        store.set_raw("products:list:p1", "x", TTL).await.unwrap();
        store.set_raw("products:list:p2", "x", TTL).await.unwrap();
        store.set_raw("products:detail:1", "x", TTL).await.unwrap();
        store.set_raw("orders:list:p1", "x", TTL).await.unwrap();

        assert_eq!(store.delete_by_prefix("products:list:").await.unwrap(), 2);
        assert!(!store.contains_key("products:list:p1"));
        assert!(store.contains_key("products:detail:1"));
        assert!(store.contains_key("orders:list:p1"));
    }

    #[tokio::test]
    async fn test_delete_by_prefix_is_idempotent() {
        let store = InMemoryCacheStore::new();
        store.set_raw("products:list:p1", "x", TTL).await.unwrap();
        assert_eq!(store.delete_by_prefix("products:list:").await.unwrap(), 1);
        assert_eq!(store.delete_by_prefix("products:list:").await.unwrap(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_single_key() {
        let store = InMemoryCacheStore::new();
        store.set_raw("a", "1", TTL).await.unwrap();
        assert!(store.delete("a").await.unwrap());
        assert!(!store.delete("a").await.unwrap());
    }
}
