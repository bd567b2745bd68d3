//! Post and comment use cases.
//!
//! Authorisation for post mutations is the handler's job (see
//! [`require_admin`](super::require_admin)); commenting is checked here
//! because any signed-in user may comment.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use super::ports::{
    CommentPersistenceError, CommentRepository, NewComment, NewPost, PostPersistenceError,
    PostRepository,
};
use super::{
    Comment, CommentText, Error, Identity, Post, PostDraft, PostFilter, PostId, User,
    display_date,
};

/// Message carried by every missing-post error.
pub const POST_NOT_FOUND_MESSAGE: &str = "Post not found.";
/// Flash shown when an anonymous visitor tries to comment.
pub const LOGIN_TO_COMMENT_MESSAGE: &str =
    "You need to be logged in to comment. Please log in (or register).";

/// A post page: the post and its comments, oldest comment first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithComments {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// Post and comment use cases.
#[derive(Clone)]
pub struct ContentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
}

impl ContentService {
    /// Wire the service to its repositories and the clock that dates new posts.
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            comments,
            clock,
        }
    }

    /// Posts newest first.
    pub async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, Error> {
        self.posts
            .list(filter)
            .await
            .map_err(map_post_persistence_error)
    }

    /// One post, or `NotFound`.
    pub async fn get_post(&self, id: PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_post_persistence_error)?
            .ok_or_else(|| Error::not_found(POST_NOT_FOUND_MESSAGE))
    }

    /// A post with its comments, oldest first.
    pub async fn get_post_with_comments(&self, id: PostId) -> Result<PostWithComments, Error> {
        let post = self.get_post(id).await?;
        let comments = self
            .comments
            .list_for_post(id)
            .await
            .map_err(map_comment_persistence_error)?;
        Ok(PostWithComments { post, comments })
    }

    /// Publish a post dated today.
    pub async fn create_post(&self, draft: &PostDraft, author: &User) -> Result<Post, Error> {
        let date = display_date(self.clock.utc().date_naive());
        let new_post = NewPost::from_draft(draft, date, author.id());
        let post = self
            .posts
            .create(&new_post)
            .await
            .map_err(map_post_persistence_error)?;
        info!(post_id = %post.id, author_id = %author.id(), "created post");
        Ok(post)
    }

    /// Replace title, subtitle, image and body. Date and author are kept.
    pub async fn update_post(&self, id: PostId, draft: &PostDraft) -> Result<Post, Error> {
        self.posts
            .update(id, draft)
            .await
            .map_err(map_post_persistence_error)?
            .ok_or_else(|| Error::not_found(POST_NOT_FOUND_MESSAGE))
    }

    /// Delete a post and its comments.
    pub async fn delete_post(&self, id: PostId) -> Result<(), Error> {
        let deleted = self
            .posts
            .delete(id)
            .await
            .map_err(map_post_persistence_error)?;
        if !deleted {
            return Err(Error::not_found(POST_NOT_FOUND_MESSAGE));
        }
        info!(post_id = %id, "deleted post");
        Ok(())
    }

    /// Attach a comment from the signed-in user. Anonymous visitors get `Unauthorized`.
    pub async fn add_comment(
        &self,
        post_id: PostId,
        identity: &Identity,
        text: CommentText,
    ) -> Result<Comment, Error> {
        let Some(author) = identity.user() else {
            return Err(Error::unauthorized(LOGIN_TO_COMMENT_MESSAGE));
        };
        self.get_post(post_id).await?;

        let new_comment = NewComment {
            post_id,
            author_id: author.id(),
            text,
        };
        self.comments
            .create(&new_comment)
            .await
            .map_err(map_comment_persistence_error)
    }
}

fn map_post_persistence_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { .. } => Error::service_unavailable(error.to_string()),
        PostPersistenceError::Query { .. } => Error::internal(error.to_string()),
        PostPersistenceError::DuplicateTitle { title } => {
            Error::conflict(format!("A post titled \"{title}\" already exists."))
        }
    }
}

fn map_comment_persistence_error(error: CommentPersistenceError) -> Error {
    match error {
        CommentPersistenceError::Connection { .. } => {
            Error::service_unavailable(error.to_string())
        }
        CommentPersistenceError::Query { .. } => Error::internal(error.to_string()),
        CommentPersistenceError::MissingReference { .. } => {
            Error::not_found(POST_NOT_FOUND_MESSAGE)
        }
    }
}

#[cfg(test)]
#[path = "content_service_tests.rs"]
mod tests;
