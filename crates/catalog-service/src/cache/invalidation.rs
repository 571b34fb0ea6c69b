//! Write-side cache invalidation.

use super::cache_keys::list_prefix;
use super::CacheStore;
use tracing::{debug, warn};

/// Drops every cached list page in `namespace`.
///
/// Call after a write has committed. Failures are logged and never returned:
/// a stale page is bounded by its TTL, a failed write is not.
pub async fn invalidate_list_caches(store: &dyn CacheStore, namespace: &str) {
    let prefix = list_prefix(namespace);
    match store.delete_by_prefix(&prefix).await {
        Ok(removed) => debug!("Invalidated {} cached list pages under '{}'", removed, prefix),
        Err(e) => warn!("List cache invalidation failed for '{}': {}", prefix, e),
    }
}
