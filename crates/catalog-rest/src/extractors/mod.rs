//! Custom Axum extractors.

mod claims;
mod list_query;
mod validated;

pub use claims::*;
pub use list_query::*;
pub use validated::*;
