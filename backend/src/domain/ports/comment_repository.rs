//! Port for comment persistence.

use async_trait::async_trait;

use crate::domain::{Comment, CommentText, PostId, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// The store could not be reached.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } => "comment repository query failed: {message}",
        /// The post or author vanished between lookup and insert.
        MissingReference { message: String } => "comment references a missing record: {message}",
    }
}

/// A comment about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: PostId,
    pub author_id: UserId,
    pub text: CommentText,
}

/// Port for comment persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments on a post, oldest first.
    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentPersistenceError>;

    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError>;
}
