//! PostgreSQL-backed [`UserRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{NewUser, StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, Role, User, UserId};

use super::diesel_basic_error_mapping::{DieselFailure, USERS_EMAIL_KEY, classify_diesel_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, email: &str) -> UserPersistenceError {
    match classify_diesel_error(error) {
        failure if failure.violates(USERS_EMAIL_KEY) => {
            UserPersistenceError::duplicate_email(email)
        }
        DieselFailure::Connection { message } => UserPersistenceError::connection(message),
        failure => UserPersistenceError::query(failure.into_message()),
    }
}

fn row_to_credentials(row: UserRow) -> Result<StoredCredentials, UserPersistenceError> {
    let (user, password_hash) = row.into_user().map_err(UserPersistenceError::query)?;
    Ok(StoredCredentials {
        user,
        password_hash,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let email = user.email.as_str();

        let row = conn
            .transaction::<UserRow, diesel::result::Error, _>(|conn| {
                async move {
                    // Serialises concurrent first sign-ups so only one sees an
                    // empty table.
                    diesel::sql_query("LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE")
                        .execute(conn)
                        .await?;
                    let existing: i64 = users::table.count().get_result(conn).await?;
                    let role = if existing == 0 {
                        Role::Admin
                    } else {
                        Role::Reader
                    };
                    diesel::insert_into(users::table)
                        .values(&NewUserRow {
                            email,
                            password_hash: user.password_hash.as_str(),
                            name: user.name.as_str(),
                            role: role.as_str(),
                        })
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|error| map_diesel_error(error, email))?;

        row_to_credentials(row).map(|stored| stored.user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.as_i32())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(error, ""))?;
        row.map(row_to_credentials)
            .transpose()
            .map(|stored| stored.map(|credentials| credentials.user))
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(error, email.as_str()))?;
        row.map(row_to_credentials).transpose()
    }
}
