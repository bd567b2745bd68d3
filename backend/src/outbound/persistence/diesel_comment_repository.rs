//! PostgreSQL-backed [`CommentRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentPersistenceError, CommentRepository, NewComment};
use crate::domain::{Comment, PostId};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{AuthorRow, CommentRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

/// Diesel-backed implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentPersistenceError {
    CommentPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> CommentPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::ForeignKeyViolation { message } => {
            CommentPersistenceError::missing_reference(message)
        }
        DieselFailure::Connection { message } => CommentPersistenceError::connection(message),
        failure => CommentPersistenceError::query(failure.into_message()),
    }
}

fn to_comment((row, author): (CommentRow, AuthorRow)) -> Result<Comment, CommentPersistenceError> {
    row.into_comment(author)
        .map_err(CommentPersistenceError::query)
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn list_for_post(
        &self,
        post_id: PostId,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(CommentRow, AuthorRow)> = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post_id.as_i32()))
            .order(comments::id.asc())
            .select((CommentRow::as_select(), AuthorRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_comment).collect()
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(comments::table)
            .values(&NewCommentRow {
                author_id: comment.author_id.as_i32(),
                post_id: comment.post_id.as_i32(),
                body: comment.text.as_str(),
            })
            .returning(CommentRow::as_returning())
            .get_result::<CommentRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let author = users::table
            .find(comment.author_id.as_i32())
            .select(AuthorRow::as_select())
            .first::<AuthorRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_comment((row, author))
    }
}
