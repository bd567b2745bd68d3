//! Port for storing and looking up users.

use async_trait::async_trait;

use crate::domain::{DisplayName, EmailAddress, HashedPassword, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by user repository adapters.
    pub enum UserPersistenceError {
        /// The store could not be reached.
        Connection { message: String } => "user repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } => "user repository query failed: {message}",
        /// The unique email index rejected the insert.
        DuplicateEmail { email: String } => "a user with email {email} already exists",
    }
}

/// A user about to be inserted. The role is decided by the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: HashedPassword,
}

/// A user together with the stored password hash, used only for login.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: HashedPassword,
}

/// Port for user persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. The first user ever stored becomes
    /// [`Role::Admin`](crate::domain::Role::Admin); role selection and insert
    /// happen in one transaction.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;
}
