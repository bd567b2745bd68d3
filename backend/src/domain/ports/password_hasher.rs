//! Port for one-way password hashing.

use crate::domain::{HashedPassword, PlainPassword};

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashers.
    pub enum PasswordHashError {
        /// Hashing or verification failed inside the algorithm.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        Malformed { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes passwords with a random salt and verifies them later.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &PlainPassword) -> Result<HashedPassword, PasswordHashError>;

    /// `Ok(false)` means the password does not match.
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &HashedPassword,
    ) -> Result<bool, PasswordHashError>;
}
