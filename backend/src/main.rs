#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), forbid(clippy::expect_used))]
//! bloggr entry-point: serves the blog or imports the seed feed.

mod server;

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use actix_web::web;
use clap::{Parser, Subcommand};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bloggr::domain::SeedImporter;
use bloggr::inbound::http::health::HealthState;
use bloggr::inbound::http::session_config::{BuildMode, session_settings};
use bloggr::outbound::password::Argon2PasswordHasher;
use bloggr::outbound::persistence::{
    DbPool, DieselSeedRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use bloggr::outbound::seed_feed::{DEFAULT_FEED_TIMEOUT, WordPressFeedSource};
use bloggr::settings::AppSettings;
use server::{ServerConfig, create_server};

/// `bloggr` command arguments. Everything else comes from `BLOGGR_*`
/// variables or the config file.
#[derive(Debug, Parser)]
#[command(name = "bloggr", about = "Server-rendered blog", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the blog (default).
    Serve,
    /// Drop all data and import posts from the WordPress feed.
    InitDb {
        /// Feed URL overriding `BLOGGR_SEED_FEED_URL`.
        #[arg(long = "feed-url", value_name = "url")]
        feed_url: Option<String>,
    },
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = AppSettings::load_from_iter([OsString::from("bloggr")])
        .map_err(|error| io::Error::other(format!("failed to load configuration: {error}")))?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&settings).await,
        Command::InitDb { feed_url } => {
            let feed_url = feed_url.unwrap_or_else(|| settings.seed_feed_url().to_owned());
            init_db(&settings, &feed_url).await
        }
    }
}

async fn connect(settings: &AppSettings) -> io::Result<DbPool> {
    let database_url = settings
        .database_url(&DefaultEnv::new())
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error.to_string()))?;
    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|error| io::Error::other(error.to_string()))
}

async fn serve(settings: &AppSettings) -> io::Result<()> {
    let session = session_settings(
        settings.secret_key.as_deref(),
        settings.cookie_secure,
        BuildMode::from_debug_assertions(),
    )
    .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error.to_string()))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error.to_string()))?;

    let pool = connect(settings).await?;
    run_pending_migrations(pool.database_url())
        .await
        .map_err(|error| io::Error::other(error.to_string()))?;

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        pool,
    );
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");
    let outcome = server.await;
    health_state.mark_unhealthy();
    info!("server stopped");
    outcome
}

async fn init_db(settings: &AppSettings, feed_url: &str) -> io::Result<()> {
    let pool = connect(settings).await?;
    let feed = WordPressFeedSource::new(DEFAULT_FEED_TIMEOUT)
        .map_err(|error| io::Error::other(format!("failed to build feed client: {error}")))?;
    let importer = SeedImporter::new(
        Arc::new(feed),
        Arc::new(DieselSeedRepository::new(pool.clone())),
        Arc::new(DieselUserRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::new()),
    );

    let outcome = importer
        .import_seed_posts(feed_url)
        .await
        .map_err(|error| io::Error::other(format!("seed import failed: {error}")))?;
    info!(
        feed_url,
        users_created = outcome.users_created,
        posts_imported = outcome.posts_imported,
        posts_skipped = outcome.posts_skipped,
        "seed import finished"
    );
    println!("users_created={}", outcome.users_created);
    println!("posts_imported={}", outcome.posts_imported);
    println!("posts_skipped={}", outcome.posts_skipped);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["bloggr"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[rstest]
    fn init_db_accepts_a_feed_override() {
        let cli = Cli::try_parse_from(["bloggr", "init-db", "--feed-url", "https://example.com/f"])
            .expect("parses");
        assert!(matches!(
            cli.command,
            Some(Command::InitDb { feed_url: Some(ref url) }) if url == "https://example.com/f"
        ));
    }
}
