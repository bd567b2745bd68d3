//! Shared helpers for the embedded PostgreSQL integration suites.

mod cluster_skip;
mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{provision_template_database, shared_cluster};
