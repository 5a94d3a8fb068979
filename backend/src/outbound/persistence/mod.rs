//! Diesel persistence adapters over a single in-memory SQLite database.

mod diesel_comment_repository;
mod diesel_product_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_product_repository::DieselProductRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbHandle, PoolError};
