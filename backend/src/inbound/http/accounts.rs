//! Registration, login and logout.
//!
//! ```text
//! GET  /register   POST /register
//! GET  /login      POST /login
//! GET  /logout
//! ```

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, get, post, web};
use tera::Context;

use crate::domain::{Error, ErrorCode};

use super::ApiResult;
use super::forms::{LoginForm, RegisterForm, field_errors};
use super::session::SessionContext;
use super::state::HttpState;

/// `303 See Other` to `location`, used after every successful POST.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location.to_owned()))
        .finish()
}

/// `302 Found` to `location`, used after GET actions.
pub(crate) fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location.to_owned()))
        .finish()
}

fn form_context<T: serde::Serialize>(form: &T, error: Option<&Error>) -> Context {
    let mut context = Context::new();
    context.insert("form", form);
    context.insert(
        "errors",
        &error.map_or_else(|| serde_json::json!({}), field_errors),
    );
    context
}

#[get("/register")]
pub async fn register_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let identity = state.identity(&session).await?;
    state.views.page(
        "register.html",
        &identity,
        &session.take_flashes(),
        form_context(&RegisterForm::default(), None),
    )
}

/// Create the account and sign it in. A taken email sends the visitor to
/// the login page with a flash message instead.
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<RegisterForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(error) => {
            let identity = state.identity(&session).await?;
            return state.views.page(
                "register.html",
                &identity,
                &session.take_flashes(),
                form_context(&form, Some(&error)),
            );
        }
    };

    match state.auth.register(&registration).await {
        Ok(user) => {
            session.persist_user(user.id())?;
            Ok(see_other("/"))
        }
        Err(error) if error.code() == ErrorCode::Conflict => {
            session.flash(error.message())?;
            Ok(see_other("/login"))
        }
        Err(error) => Err(error),
    }
}

#[get("/login")]
pub async fn login_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let identity = state.identity(&session).await?;
    state.views.page(
        "login.html",
        &identity,
        &session.take_flashes(),
        form_context(&LoginForm::default(), None),
    )
}

/// Check credentials. Failures re-render the login page with the reason as
/// a flash message and leave the session untouched.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let mut messages = session.take_flashes();
    let error = match form.validate() {
        Ok(credentials) => match state.auth.login(&credentials).await {
            Ok(user) => {
                session.persist_user(user.id())?;
                return Ok(see_other("/"));
            }
            Err(error) if error.code() == ErrorCode::Unauthorized => {
                messages.push(error.message().to_owned());
                None
            }
            Err(error) => return Err(error),
        },
        Err(error) => Some(error),
    };

    let identity = state.identity(&session).await?;
    state.views.page(
        "login.html",
        &identity,
        &messages,
        form_context(&form, error.as_ref()),
    )
}

#[get("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.logout();
    found("/")
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
