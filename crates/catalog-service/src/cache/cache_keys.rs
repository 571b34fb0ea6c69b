//! Cache key derivation for list queries.
//!
//! Keys have the shape
//!
//! ```text
//! <namespace>:list:p<page>:s<page_size>:q<len>:<search>:o<sort>
//! ```
//!
//! where `<len>` is the character count of the normalized search term. With
//! the length in front, a term containing `:` or something that looks like a
//! later field can never be confused with a different query.

use catalog_core::{ListQuery, NormalizedListQuery};
use tracing::trace;

/// Namespace for product list keys.
pub const PRODUCTS_NAMESPACE: &str = "products";

/// Prefix shared by every list key in `namespace`.
#[must_use]
pub fn list_prefix(namespace: &str) -> String {
    format!("{namespace}:list:")
}

/// Key for an already-normalized query.
#[must_use]
pub fn list_key(namespace: &str, query: &NormalizedListQuery) -> String {
    let search = query.search().unwrap_or_default();
    let key = format!(
        "{}p{}:s{}:q{}:{}:o{}",
        list_prefix(namespace),
        query.page(),
        query.page_size(),
        search.chars().count(),
        search,
        query.sort().as_str(),
    );
    trace!("Derived cache key '{}'", key);
    key
}

/// Normalizes `query` and derives its key.
#[must_use]
pub fn derive_key(namespace: &str, query: &ListQuery) -> String {
    list_key(namespace, &query.normalize())
}
