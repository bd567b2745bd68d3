//! `bb8` pool of `diesel-async` PostgreSQL connections.
//!
//! Checkouts wait at most `connection_timeout`. Failures are reported as
//! [`PoolError`] so each repository can fold them into its own
//! `Connection` variant.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Failures raised while building or using the pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    pub fn into_message(self) -> String {
        match self {
            Self::Checkout { message } | Self::Build { message } => message,
        }
    }
}

/// Pool sizing and the database to connect to.
///
/// Defaults: 10 connections, 1 kept idle, 5 second checkout timeout.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            min_idle: Some(1),
            connection_timeout: Duration::from_secs(5),
        }
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    #[must_use]
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Cloneable handle to the shared pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
    database_url: String,
}

impl DbPool {
    /// Build the pool and open the initial idle connections.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(
            config.database_url.as_str(),
        );
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|error| PoolError::build(error.to_string()))?;
        Ok(Self {
            inner,
            database_url: config.database_url,
        })
    }

    /// Check out a connection, waiting up to the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|error| PoolError::checkout(error.to_string()))
    }

    /// URL the pool connects to; migrations open their own blocking
    /// connection with it.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn config_defaults() {
        let config = PoolConfig::new("postgres://localhost/bloggr");
        assert_eq!(config.database_url(), "postgres://localhost/bloggr");
        assert_eq!(config.max_size, 10);
        assert_eq!(config.min_idle, Some(1));
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
    }

    #[rstest]
    fn config_overrides() {
        let config = PoolConfig::new("postgres://localhost/bloggr")
            .with_max_size(4)
            .with_min_idle(None)
            .with_connection_timeout(Duration::from_millis(250));
        assert_eq!(config.max_size, 4);
        assert_eq!(config.min_idle, None);
        assert_eq!(config.connection_timeout, Duration::from_millis(250));
    }

    #[rstest]
    #[case(PoolError::checkout("timed out"))]
    #[case(PoolError::build("bad url"))]
    fn errors_expose_their_message(#[case] error: PoolError) {
        let rendered = error.to_string();
        let message = error.into_message();
        assert!(rendered.ends_with(&message));
    }
}
