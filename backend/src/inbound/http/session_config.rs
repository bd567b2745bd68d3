//! Session cookie settings derived from [`AppSettings`](crate::settings::AppSettings).
//!
//! The signing and encryption key is derived from the configured secret.
//! Release builds refuse to start without a strong secret; debug builds fall
//! back to an ephemeral key so local runs need no setup.

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroizing;

/// Minimum secret length accepted by [`Key::derive_from`].
pub const SECRET_KEY_MIN_LEN: usize = 32;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing secret and warn.
    Debug,
    /// Release builds require a valid secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Session settings ready for `SessionMiddleware`.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Why the session secret was refused.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SessionConfigError {
    #[error("BLOGGR_SECRET_KEY must be set in release builds")]
    MissingSecret,
    #[error("BLOGGR_SECRET_KEY too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
}

/// Build session settings from the configured secret.
///
/// # Examples
///
/// ```rust
/// use bloggr::inbound::http::session_config::{BuildMode, session_settings};
///
/// let secret = "8BYkEfBA6O6donzWlSihBXox7C0sKR6b".to_owned();
/// let settings = session_settings(Some(&secret), true, BuildMode::Release)
///     .expect("32-byte secret is accepted");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings(
    secret: Option<&str>,
    cookie_secure: bool,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    Ok(SessionSettings {
        key: session_key(secret, mode)?,
        cookie_secure,
        same_site: SameSite::Lax,
    })
}

fn session_key(secret: Option<&str>, mode: BuildMode) -> Result<Key, SessionConfigError> {
    let error = match secret.map(|raw| Zeroizing::new(raw.as_bytes().to_vec())) {
        Some(bytes) if bytes.len() >= SECRET_KEY_MIN_LEN => return Ok(Key::derive_from(&bytes)),
        Some(bytes) => SessionConfigError::SecretTooShort {
            length: bytes.len(),
            min_len: SECRET_KEY_MIN_LEN,
        },
        None => SessionConfigError::MissingSecret,
    };

    if mode.is_debug() {
        warn!(%error, "using temporary session key (dev only)");
        Ok(Key::generate())
    } else {
        Err(error)
    }
}
