//! Embedded Diesel migrations.
//!
//! `diesel_migrations` only drives synchronous connections, so each call
//! opens a short-lived `PgConnection` on the blocking thread pool.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures raised while migrating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    #[error("migration failed: {message}")]
    Apply { message: String },
}

impl MigrationError {
    fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    fn apply(message: impl Into<String>) -> Self {
        Self::Apply {
            message: message.into(),
        }
    }
}

/// Apply migrations that have not run yet. Existing data is untouched.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    with_connection(database_url, |conn| {
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|error| MigrationError::apply(error.to_string()))?
            .len();
        info!(applied, "pending migrations applied");
        Ok(())
    })
    .await
}

/// Revert every migration and re-apply them, leaving an empty schema.
pub async fn reset_schema(database_url: &str) -> Result<(), MigrationError> {
    with_connection(database_url, |conn| {
        conn.revert_all_migrations(MIGRATIONS)
            .map_err(|error| MigrationError::apply(error.to_string()))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|error| MigrationError::apply(error.to_string()))?;
        info!("schema reset to the latest migration");
        Ok(())
    })
    .await
}

async fn with_connection<F>(database_url: &str, work: F) -> Result<(), MigrationError>
where
    F: FnOnce(&mut PgConnection) -> Result<(), MigrationError> + Send + 'static,
{
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url)
            .map_err(|error| MigrationError::connect(error.to_string()))?;
        work(&mut conn)
    })
    .await
    .map_err(|error| MigrationError::apply(format!("migration task failed: {error}")))?
}
