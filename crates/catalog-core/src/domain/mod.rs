//! Domain entities for the catalog.

pub mod product;
pub mod user;

pub use product::*;
pub use user::*;
