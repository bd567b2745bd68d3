//! Port for the destructive parts of seeding: schema reset and inserts with
//! caller-chosen ids.

use async_trait::async_trait;

use crate::domain::PostId;

use super::{NewPost, define_port_error};

define_port_error! {
    /// Failures raised by seed repository adapters.
    pub enum SeedPersistenceError {
        /// The store could not be reached.
        Connection { message: String } => "seed repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } => "seed repository query failed: {message}",
        /// Reverting or re-applying migrations failed.
        Migration { message: String } => "schema reset failed: {message}",
    }
}

/// A post imported with the id it had in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPost {
    pub id: PostId,
    pub post: NewPost,
}

/// Port for the bulk writes the seed import needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeedRepository: Send + Sync {
    /// Drop every table and re-create the schema.
    async fn reset_schema(&self) -> Result<(), SeedPersistenceError>;

    async fn insert_post(&self, post: &SeedPost) -> Result<(), SeedPersistenceError>;

    /// Move id sequences past explicitly inserted ids.
    async fn sync_sequences(&self) -> Result<(), SeedPersistenceError>;
}
