//! PostgreSQL-backed [`SeedRepository`].

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SeedPersistenceError, SeedPost, SeedRepository};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error};
use super::migrations::{self, MigrationError};
use super::models::SeedPostRow;
use super::pool::{DbPool, PoolError};
use super::schema::blog_posts;

const SYNC_SEQUENCES_SQL: [&str; 3] = [
    "SELECT setval(pg_get_serial_sequence('users', 'id'), \
     COALESCE((SELECT MAX(id) FROM users), 0) + 1, false)",
    "SELECT setval(pg_get_serial_sequence('blog_posts', 'id'), \
     COALESCE((SELECT MAX(id) FROM blog_posts), 0) + 1, false)",
    "SELECT setval(pg_get_serial_sequence('comments', 'id'), \
     COALESCE((SELECT MAX(id) FROM comments), 0) + 1, false)",
];

/// Diesel-backed implementation of the seed repository port.
#[derive(Clone)]
pub struct DieselSeedRepository {
    pool: DbPool,
}

impl DieselSeedRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SeedPersistenceError {
    SeedPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> SeedPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection { message } => SeedPersistenceError::connection(message),
        failure => SeedPersistenceError::query(failure.into_message()),
    }
}

fn map_migration_error(error: MigrationError) -> SeedPersistenceError {
    match error {
        MigrationError::Connect { message } => SeedPersistenceError::connection(message),
        MigrationError::Apply { message } => SeedPersistenceError::migration(message),
    }
}

#[async_trait]
impl SeedRepository for DieselSeedRepository {
    async fn reset_schema(&self) -> Result<(), SeedPersistenceError> {
        migrations::reset_schema(self.pool.database_url())
            .await
            .map_err(map_migration_error)
    }

    async fn insert_post(&self, seed: &SeedPost) -> Result<(), SeedPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let post = &seed.post;
        diesel::insert_into(blog_posts::table)
            .values(&SeedPostRow {
                id: seed.id.as_i32(),
                author_id: post.author_id.as_i32(),
                title: post.title.as_str(),
                subtitle: &post.subtitle,
                display_date: &post.date,
                body: &post.body,
                img_url: &post.img_url,
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn sync_sequences(&self) -> Result<(), SeedPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        for statement in SYNC_SEQUENCES_SQL {
            diesel::sql_query(statement)
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        }
        Ok(())
    }
}
