//! Data Transfer Objects (DTOs).

mod auth_dto;
mod product_dto;

pub use auth_dto::*;
pub use product_dto::*;
