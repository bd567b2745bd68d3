//! PostgreSQL adapters built on Diesel, `diesel-async` and `bb8`.
//!
//! Row structs (`models`) and table definitions (`schema`) stay private to
//! this module; repositories translate them into domain types and fold every
//! Diesel failure into the matching port error.

mod diesel_basic_error_mapping;
mod diesel_comment_repository;
mod diesel_post_repository;
mod diesel_seed_repository;
mod diesel_user_repository;
pub mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_seed_repository::DieselSeedRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
