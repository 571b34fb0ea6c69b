//! PostgreSQL repository implementations.

mod product_repository;
mod user_repository;

pub use product_repository::*;
pub use user_repository::*;

/// Escapes `LIKE` metacharacters so a search term matches literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
