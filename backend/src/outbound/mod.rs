//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel
//! - **seed_feed**: reqwest client for the WordPress post feed
//! - **password**: Argon2 password hashing
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod password;
pub mod persistence;
pub mod seed_feed;
