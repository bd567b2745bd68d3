//! Builders for HTTP adapter state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use bloggr::inbound::http::state::{HttpState, HttpStatePorts};
use bloggr::inbound::http::views::Views;
use bloggr::outbound::password::Argon2PasswordHasher;
use bloggr::outbound::persistence::{
    DieselCommentRepository, DieselPostRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Wire the Diesel repositories, the Argon2 hasher and the compiled templates
/// into handler state.
///
/// # Errors
/// Returns [`std::io::Error`] when a template fails to compile.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let pool = config.db_pool.clone();
    let views = Views::new()
        .map_err(|error| std::io::Error::other(format!("template compilation failed: {error}")))?;
    let ports = HttpStatePorts {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        posts: Arc::new(DieselPostRepository::new(pool.clone())),
        comments: Arc::new(DieselCommentRepository::new(pool)),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        clock: Arc::new(DefaultClock),
    };
    Ok(web::Data::new(HttpState::new(ports, Arc::new(views))))
}
