//! Port for blog post persistence.

use async_trait::async_trait;

use crate::domain::{Post, PostDraft, PostFilter, PostId, PostTitle, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by post repository adapters.
    pub enum PostPersistenceError {
        /// The store could not be reached.
        Connection { message: String } => "post repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } => "post repository query failed: {message}",
        /// Another post already uses the title.
        DuplicateTitle { title: String } => "a post titled {title} already exists",
    }
}

/// A post about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: PostTitle,
    pub subtitle: String,
    pub body: String,
    pub img_url: String,
    /// Display string, already formatted.
    pub date: String,
    pub author_id: UserId,
}

impl NewPost {
    /// Combine a validated draft with the fields the service assigns.
    pub fn from_draft(draft: &PostDraft, date: String, author_id: UserId) -> Self {
        Self {
            title: draft.title().clone(),
            subtitle: draft.subtitle().to_owned(),
            body: draft.body().to_owned(),
            img_url: draft.img_url().to_owned(),
            date,
            author_id,
        }
    }
}

/// Port for post persistence. Posts always come back with their author.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Posts matching `filter`, newest id first.
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, PostPersistenceError>;

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError>;

    async fn create(&self, post: &NewPost) -> Result<Post, PostPersistenceError>;

    /// Replace the editable fields. Returns `None` when the post is missing.
    async fn update(
        &self,
        id: PostId,
        draft: &PostDraft,
    ) -> Result<Option<Post>, PostPersistenceError>;

    /// Delete a post and its comments in one transaction. Returns `false`
    /// when nothing was deleted.
    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError>;
}
