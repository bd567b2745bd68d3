//! Argon2id implementation of [`PasswordHasher`], storing PHC strings.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{HashedPassword, PlainPassword};

/// Hashes with the crate's default Argon2id parameters and a fresh salt per
/// password. Parameters are embedded in each hash, so changing them later
/// does not invalidate stored credentials.
#[derive(Default, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Hasher with default parameters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|error| PasswordHashError::hash(error.to_string()))?;
        Ok(HashedPassword::new(hash.to_string()))
    }

    fn verify(
        &self,
        password: &PlainPassword,
        hash: &HashedPassword,
    ) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(hash.as_str())
            .map_err(|error| PasswordHashError::malformed(error.to_string()))?;
        match self
            .argon2
            .verify_password(password.expose().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(error) => Err(PasswordHashError::hash(error.to_string())),
        }
    }
}
