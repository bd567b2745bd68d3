//! Embedded PostgreSQL provisioning.
//!
//! One cluster is shared per test binary. Each test gets its own database
//! cloned from a template that already carries the blog schema, so suites
//! never see each other's rows.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use bloggr::outbound::persistence::migrations::MIGRATIONS;
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use uuid::Uuid;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "bloggr_template";
const PROVISION_RETRIES: usize = 3;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

/// The process-wide cluster, started on first use.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    shared_cluster_handle().map_err(|err| format!("start embedded cluster: {err:?}"))
}

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

// Keyed by the migrations hash so a schema change never reuses a stale
// template left in a cached data directory.
fn template_database_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migrate template: {err}"))?;
    Ok(())
}

fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _guard = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        migrate_schema(&cluster.connection().database_url(&template_name))?;
    }
    Ok(template_name)
}

/// A fresh, migrated database that is dropped with the returned guard.
pub fn provision_template_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let mut last_error = String::from("no provisioning attempt ran");
    for attempt in 1..=PROVISION_RETRIES {
        let provisioned = ensure_template_database(cluster).and_then(|template| {
            let name = format!("test_{}", Uuid::new_v4().simple());
            cluster
                .temporary_database_from_template(name.as_str(), template.as_str())
                .map_err(|err| format!("clone template: {err:?}"))
        });
        match provisioned {
            Ok(database) => return Ok(database),
            Err(error) => last_error = format!("attempt {attempt}/{PROVISION_RETRIES}: {error}"),
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error)
}
