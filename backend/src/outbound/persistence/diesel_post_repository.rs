//! PostgreSQL-backed [`PostRepository`].
//!
//! Posts are always read joined with their author so the domain never sees a
//! bare foreign key.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{NewPost, PostPersistenceError, PostRepository};
use crate::domain::{Post, PostDraft, PostFilter, PostId};

use super::diesel_basic_error_mapping::{
    BLOG_POSTS_TITLE_KEY, DieselFailure, classify_diesel_error,
};
use super::models::{AuthorRow, NewPostRow, PostRow, PostUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{blog_posts, comments, users};

/// Diesel-backed implementation of the post repository port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostPersistenceError {
    PostPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, title: &str) -> PostPersistenceError {
    match classify_diesel_error(error) {
        failure if failure.violates(BLOG_POSTS_TITLE_KEY) => {
            PostPersistenceError::duplicate_title(title)
        }
        DieselFailure::Connection { message } => PostPersistenceError::connection(message),
        failure => PostPersistenceError::query(failure.into_message()),
    }
}

fn to_post((row, author): (PostRow, AuthorRow)) -> Result<Post, PostPersistenceError> {
    row.into_post(author).map_err(PostPersistenceError::query)
}

async fn load_post(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> QueryResult<Option<(PostRow, AuthorRow)>> {
    blog_posts::table
        .inner_join(users::table)
        .filter(blog_posts::id.eq(id))
        .select((PostRow::as_select(), AuthorRow::as_select()))
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = blog_posts::table
            .inner_join(users::table)
            .select((PostRow::as_select(), AuthorRow::as_select()))
            .order(blog_posts::id.desc())
            .into_boxed();
        if let PostFilter::ByAuthorName(name) = filter {
            query = query.filter(users::name.eq(name.as_str()));
        }
        let rows: Vec<(PostRow, AuthorRow)> = query
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, ""))?;
        rows.into_iter().map(to_post).collect()
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = load_post(&mut conn, id.as_i32())
            .await
            .map_err(|error| map_diesel_error(error, ""))?;
        row.map(to_post).transpose()
    }

    async fn create(&self, post: &NewPost) -> Result<Post, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let title = post.title.as_str();
        let id: i32 = diesel::insert_into(blog_posts::table)
            .values(&NewPostRow {
                author_id: post.author_id.as_i32(),
                title,
                subtitle: &post.subtitle,
                display_date: &post.date,
                body: &post.body,
                img_url: &post.img_url,
            })
            .returning(blog_posts::id)
            .get_result(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, title))?;
        let row = load_post(&mut conn, id)
            .await
            .map_err(|error| map_diesel_error(error, title))?
            .ok_or_else(|| PostPersistenceError::query("inserted post vanished"))?;
        to_post(row)
    }

    async fn update(
        &self,
        id: PostId,
        draft: &PostDraft,
    ) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let title = draft.title().as_str();
        let updated = diesel::update(blog_posts::table.find(id.as_i32()))
            .set(&PostUpdate {
                title,
                subtitle: draft.subtitle(),
                body: draft.body(),
                img_url: draft.img_url(),
            })
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, title))?;
        if updated == 0 {
            return Ok(None);
        }
        load_post(&mut conn, id.as_i32())
            .await
            .map_err(|error| map_diesel_error(error, title))?
            .map(to_post)
            .transpose()
    }

    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw_id = id.as_i32();
        let deleted = conn
            .transaction::<usize, diesel::result::Error, _>(|conn| {
                async move {
                    diesel::delete(comments::table.filter(comments::post_id.eq(raw_id)))
                        .execute(conn)
                        .await?;
                    diesel::delete(blog_posts::table.find(raw_id))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|error| map_diesel_error(error, ""))?;
        Ok(deleted > 0)
    }
}
