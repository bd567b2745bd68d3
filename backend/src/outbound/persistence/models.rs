//! Diesel row structs. Internal to the persistence adapters.

use diesel::prelude::*;

use crate::domain::{
    AuthorSummary, Comment, CommentId, CommentText, DisplayName, EmailAddress, HashedPassword,
    Post, PostId, PostTitle, Role, User, UserId,
};

use super::schema::{blog_posts, comments, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<(User, HashedPassword), String> {
        let name = DisplayName::new(&self.name).map_err(|error| error.to_string())?;
        let email = EmailAddress::new(&self.email).map_err(|error| error.to_string())?;
        let role = Role::try_from(self.role.as_str()).map_err(|error| error.to_string())?;
        Ok((
            User::new(UserId::new(self.id), name, email, role),
            HashedPassword::new(self.password_hash),
        ))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub role: &'a str,
}

/// The author columns joined onto posts and comments.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuthorRow {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl AuthorRow {
    fn into_summary(self) -> Result<AuthorSummary, String> {
        Ok(AuthorSummary {
            id: UserId::new(self.id),
            name: DisplayName::new(&self.name).map_err(|error| error.to_string())?,
            email: EmailAddress::new(&self.email).map_err(|error| error.to_string())?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = blog_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub display_date: String,
    pub body: String,
    pub img_url: String,
}

impl PostRow {
    pub(crate) fn into_post(self, author: AuthorRow) -> Result<Post, String> {
        Ok(Post {
            id: PostId::new(self.id),
            title: PostTitle::new(&self.title).map_err(|error| error.to_string())?,
            subtitle: self.subtitle,
            date: self.display_date,
            body: self.body,
            img_url: self.img_url,
            author: author.into_summary()?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blog_posts)]
pub(crate) struct NewPostRow<'a> {
    pub author_id: i32,
    pub title: &'a str,
    pub subtitle: &'a str,
    pub display_date: &'a str,
    pub body: &'a str,
    pub img_url: &'a str,
}

/// Insert with an explicit id, used only by the seed import.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blog_posts)]
pub(crate) struct SeedPostRow<'a> {
    pub id: i32,
    pub author_id: i32,
    pub title: &'a str,
    pub subtitle: &'a str,
    pub display_date: &'a str,
    pub body: &'a str,
    pub img_url: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = blog_posts)]
pub(crate) struct PostUpdate<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub body: &'a str,
    pub img_url: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i32,
    pub post_id: i32,
    pub body: String,
}

impl CommentRow {
    pub(crate) fn into_comment(self, author: AuthorRow) -> Result<Comment, String> {
        Ok(Comment {
            id: CommentId::new(self.id),
            post_id: PostId::new(self.post_id),
            author: author.into_summary()?,
            text: CommentText::new(&self.body).map_err(|error| error.to_string())?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub author_id: i32,
    pub post_id: i32,
    pub body: &'a str,
}
