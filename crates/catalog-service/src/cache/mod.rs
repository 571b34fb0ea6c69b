//! List caching.
//!
//! ```text
//! list request ──► ListCache::get_page ──► cache_keys::list_key
//!                        │                       │
//!                        ▼                       ▼
//!                  CacheStore::get ──miss──► fetcher ──► CacheStore::set
//!
//! create/update/delete ──► invalidate_list_caches ──► CacheStore::delete_by_prefix
//! ```
//!
//! Every cache failure on the read path degrades to a miss, and every cache
//! failure on the write path is logged and dropped. The system of record is
//! always the repository.

pub mod cache_keys;
mod cache_store;
mod guarded;
mod invalidation;
mod memory_cache;
mod read_through;
mod redis_cache;

pub use cache_store::{CacheExt, CacheHealthCheck, CacheStore, CACHE_SCHEMA_VERSION};
pub use guarded::GuardedCacheStore;
pub use invalidation::invalidate_list_caches;
pub use memory_cache::InMemoryCacheStore;
pub use read_through::{CachedPage, ListCache};
pub use redis_cache::{create_redis_pool, RedisCacheStore};

#[cfg(test)]
pub(crate) use cache_store::MockCacheStore;
