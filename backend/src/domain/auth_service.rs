//! Registration, login and identity resolution.
//!
//! The service never touches the HTTP session. Handlers persist or purge the
//! session user id and pass it back in through [`AuthService::current_identity`].

use std::sync::Arc;

use tracing::{info, warn};

use super::ports::{NewUser, PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository};
use super::{Error, Identity, LoginCredentials, Registration, User, UserId};

/// Login failure shown when no account uses the email.
pub const UNKNOWN_EMAIL_MESSAGE: &str = "That email does not exist, please try again.";
/// Login failure shown when the password does not verify.
pub const WRONG_PASSWORD_MESSAGE: &str = "Password incorrect, please try again.";
/// Registration failure shown when the email is taken.
pub const DUPLICATE_EMAIL_MESSAGE: &str =
    "You've already signed up with that email, log in instead!";

/// Authentication use cases over a user repository and a password hasher.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthService {
    /// Wire the service to its user store and hasher.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Create an account.
    ///
    /// The email is checked up front so the common case never reaches the
    /// unique index; a concurrent sign-up still surfaces as `Conflict`.
    pub async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let existing = self
            .users
            .find_credentials_by_email(registration.email())
            .await
            .map_err(map_user_persistence_error)?;
        if existing.is_some() {
            return Err(Error::conflict(DUPLICATE_EMAIL_MESSAGE));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_password_hash_error)?;
        let new_user = NewUser {
            name: registration.name().clone(),
            email: registration.email().clone(),
            password_hash,
        };
        let user = self
            .users
            .create(&new_user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), role = user.role().as_str(), "registered user");
        Ok(user)
    }

    /// Check an email and password pair.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(stored) = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
        else {
            return Err(Error::unauthorized(UNKNOWN_EMAIL_MESSAGE));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_password_hash_error)?;
        if !matches {
            return Err(Error::unauthorized(WRONG_PASSWORD_MESSAGE));
        }
        Ok(stored.user)
    }

    /// Resolve the user id held in the session. Ids that no longer match a
    /// user resolve to [`Identity::Anonymous`].
    pub async fn current_identity(&self, user_id: Option<UserId>) -> Result<Identity, Error> {
        let Some(user_id) = user_id else {
            return Ok(Identity::Anonymous);
        };
        match self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?
        {
            Some(user) => Ok(Identity::Authenticated(user)),
            None => {
                warn!(%user_id, "session refers to an unknown user");
                Ok(Identity::Anonymous)
            }
        }
    }
}

/// Allow only the admin through.
///
/// Anonymous callers get `Unauthorized`; signed-in readers get `Forbidden`.
pub fn require_admin(identity: &Identity) -> Result<&User, Error> {
    match identity {
        Identity::Anonymous => Err(Error::unauthorized("You need to log in to do that.")),
        Identity::Authenticated(user) if user.is_admin() => Ok(user),
        Identity::Authenticated(_) => Err(Error::forbidden("Only the blog admin can do that.")),
    }
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { .. } => Error::service_unavailable(error.to_string()),
        UserPersistenceError::Query { .. } => Error::internal(error.to_string()),
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict(DUPLICATE_EMAIL_MESSAGE),
    }
}

fn map_password_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
