//! Application settings loaded via OrthoConfig.
//!
//! Values come from `BLOGGR_*` environment variables or a config file.
//! Command-line parsing is handled separately by the `bloggr` binary.

use std::net::SocketAddr;

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_SEED_FEED_URL;

/// Listen address used when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
/// Conventional variable consulted when `BLOGGR_DATABASE_URL` is unset.
pub const FALLBACK_DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Settings that are present but unusable.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("no database configured; set BLOGGR_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Runtime settings from `BLOGGR_*` variables, config files and the CLI.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOGGR")]
pub struct AppSettings {
    /// Secret the session cookie key is derived from.
    pub secret_key: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Mark session cookies `Secure`. Enable behind TLS.
    #[ortho_config(default = false)]
    pub cookie_secure: bool,
    /// WordPress posts endpoint used by `init-db`.
    pub seed_feed_url: Option<String>,
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("bind_addr", &self.bind_addr)
            .field("cookie_secure", &self.cookie_secure)
            .field("seed_feed_url", &self.seed_feed_url)
            .finish()
    }
}

impl AppSettings {
    /// `BLOGGR_DATABASE_URL`, else `DATABASE_URL`.
    pub fn database_url<E: Env>(&self, env: &E) -> Result<String, SettingsError> {
        self.database_url
            .clone()
            .or_else(|| env.string(FALLBACK_DATABASE_URL_ENV))
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Configured listen address, or the default.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Configured feed URL, or [`DEFAULT_SEED_FEED_URL`].
    pub fn seed_feed_url(&self) -> &str {
        self.seed_feed_url.as_deref().unwrap_or(DEFAULT_SEED_FEED_URL)
    }
}
