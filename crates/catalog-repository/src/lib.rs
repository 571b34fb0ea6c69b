//! # Catalog Repository
//!
//! Data access for products and users.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ProductRepository> / Arc<dyn UserRepository>
//! PgProductRepository / PgUserRepository    (PostgreSQL via SQLx)
//! InMemoryProductRepository / ...           (tests, local development)
//! ```
//!
//! Both implementations share the same list semantics: case-insensitive
//! substring search over name OR type, the three [`SortKey`] orderings with
//! identity as the tie-breaker, and offset pagination applied after filtering.
//!
//! [`SortKey`]: catalog_core::SortKey

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod traits;

pub use memory::*;
pub use pool::*;
pub use postgres::*;
pub use traits::*;
