//! Post listing, reading, commenting and the admin editor.
//!
//! ```text
//! GET  /?author=<name>
//! GET  /post/{id}        POST /post/{id}
//! GET  /new-post         POST /new-post
//! GET  /edit-post/{id}   POST /edit-post/{id}
//! GET  /delete/{id}
//! ```
//!
//! Admin routes call [`require_admin`] before touching anything else.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use tera::Context;

use crate::domain::content_service::LOGIN_TO_COMMENT_MESSAGE;
use crate::domain::{Error, ErrorCode, Identity, PostFilter, PostId, require_admin};

use super::ApiResult;
use super::accounts::{found, see_other};
use super::forms::{CommentForm, PostForm, field_errors};
use super::session::SessionContext;
use super::state::HttpState;

/// Query string of the index page.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub author: Option<String>,
}

#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<IndexQuery>,
) -> ApiResult<HttpResponse> {
    let identity = state.identity(&session).await?;
    let filter = PostFilter::from_author_param(query.author.as_deref());
    let posts = state.content.list_posts(&filter).await?;

    let mut context = Context::new();
    context.insert("posts", &posts);
    context.insert(
        "author",
        &match &filter {
            PostFilter::All => None,
            PostFilter::ByAuthorName(name) => Some(name),
        },
    );
    state
        .views
        .page("index.html", &identity, &session.take_flashes(), context)
}

async fn render_post(
    state: &HttpState,
    session: &SessionContext,
    identity: &Identity,
    id: PostId,
    form: &CommentForm,
    error: Option<&Error>,
) -> ApiResult<HttpResponse> {
    let page = state.content.get_post_with_comments(id).await?;
    let mut context = Context::new();
    context.insert("post", &page.post);
    context.insert("comments", &page.comments);
    context.insert("form", form);
    context.insert(
        "errors",
        &error.map_or_else(|| serde_json::json!({}), field_errors),
    );
    state
        .views
        .page("post.html", identity, &session.take_flashes(), context)
}

#[get("/post/{id}")]
pub async fn show_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let identity = state.identity(&session).await?;
    let id = PostId::new(path.into_inner());
    render_post(&state, &session, &identity, id, &CommentForm::default(), None).await
}

/// Add a comment. Anonymous visitors are sent to the login page.
#[post("/post/{id}")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    form: web::Form<CommentForm>,
) -> ApiResult<HttpResponse> {
    let id = PostId::new(path.into_inner());
    let identity = state.identity(&session).await?;
    if !identity.is_authenticated() {
        session.flash(LOGIN_TO_COMMENT_MESSAGE)?;
        return Ok(see_other("/login"));
    }

    let form = form.into_inner();
    match form.validate() {
        Ok(text) => {
            state.content.add_comment(id, &identity, text).await?;
            Ok(see_other(&format!("/post/{id}")))
        }
        Err(error) => render_post(&state, &session, &identity, id, &form, Some(&error)).await,
    }
}

fn render_editor(
    state: &HttpState,
    session: &SessionContext,
    identity: &Identity,
    action: &str,
    form: &PostForm,
    error: Option<&Error>,
) -> ApiResult<HttpResponse> {
    let mut context = Context::new();
    context.insert("form", form);
    context.insert("action", action);
    context.insert("is_edit", &action.starts_with("/edit-post/"));
    let errors = match error {
        Some(error) if error.code() == ErrorCode::Conflict => {
            serde_json::json!({ "title": error.message() })
        }
        Some(error) => field_errors(error),
        None => serde_json::json!({}),
    };
    context.insert("errors", &errors);
    state
        .views
        .page("make-post.html", identity, &session.take_flashes(), context)
}

#[get("/new-post")]
pub async fn new_post_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let identity = state.identity(&session).await?;
    require_admin(&identity)?;
    render_editor(
        &state,
        &session,
        &identity,
        "/new-post",
        &PostForm::default(),
        None,
    )
}

#[post("/new-post")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<PostForm>,
) -> ApiResult<HttpResponse> {
    let identity = state.identity(&session).await?;
    let admin = require_admin(&identity)?;
    let form = form.into_inner();

    let result = match form.validate() {
        Ok(draft) => state.content.create_post(&draft, admin).await.map(|_| ()),
        Err(error) => Err(error),
    };
    match result {
        Ok(()) => Ok(see_other("/")),
        Err(error) if is_form_error(&error) => {
            render_editor(&state, &session, &identity, "/new-post", &form, Some(&error))
        }
        Err(error) => Err(error),
    }
}

#[get("/edit-post/{id}")]
pub async fn edit_post_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let identity = state.identity(&session).await?;
    require_admin(&identity)?;
    let id = PostId::new(path.into_inner());
    let post = state.content.get_post(id).await?;
    render_editor(
        &state,
        &session,
        &identity,
        &format!("/edit-post/{id}"),
        &PostForm::from(&post),
        None,
    )
}

/// Replace the editable fields. Date and author are kept.
#[post("/edit-post/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    form: web::Form<PostForm>,
) -> ApiResult<HttpResponse> {
    let identity = state.identity(&session).await?;
    require_admin(&identity)?;
    let id = PostId::new(path.into_inner());
    state.content.get_post(id).await?;
    let form = form.into_inner();

    let result = match form.validate() {
        Ok(draft) => state.content.update_post(id, &draft).await.map(|_| ()),
        Err(error) => Err(error),
    };
    match result {
        Ok(()) => Ok(see_other(&format!("/post/{id}"))),
        Err(error) if is_form_error(&error) => render_editor(
            &state,
            &session,
            &identity,
            &format!("/edit-post/{id}"),
            &form,
            Some(&error),
        ),
        Err(error) => Err(error),
    }
}

#[get("/delete/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let identity = state.identity(&session).await?;
    require_admin(&identity)?;
    state
        .content
        .delete_post(PostId::new(path.into_inner()))
        .await?;
    Ok(found("/"))
}

/// Errors shown next to the editor fields rather than as an error page.
fn is_form_error(error: &Error) -> bool {
    matches!(
        error.code(),
        ErrorCode::InvalidRequest | ErrorCode::Conflict
    )
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
