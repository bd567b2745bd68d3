//! Static pages.

use actix_web::{HttpResponse, get, web};
use tera::Context;

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

async fn static_page(
    state: &HttpState,
    session: &SessionContext,
    template: &str,
) -> ApiResult<HttpResponse> {
    let identity = state.identity(session).await?;
    state
        .views
        .page(template, &identity, &session.take_flashes(), Context::new())
}

#[get("/about")]
pub async fn about(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    static_page(&state, &session, "about.html").await
}

#[get("/contact")]
pub async fn contact(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    static_page(&state, &session, "contact.html").await
}
