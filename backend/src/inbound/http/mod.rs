//! HTTP inbound adapter: HTML pages, forms and the session cookie.

pub mod accounts;
pub mod error;
pub mod forms;
pub mod health;
pub mod pages;
pub mod posts;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod views;

use actix_web::web;

pub use error::ApiResult;

/// Register every blog route. Health probes are registered separately so
/// they stay outside the session middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(posts::index)
        .service(posts::show_post)
        .service(posts::add_comment)
        .service(posts::new_post_form)
        .service(posts::create_post)
        .service(posts::edit_post_form)
        .service(posts::update_post)
        .service(posts::delete_post)
        .service(accounts::register_form)
        .service(accounts::register)
        .service(accounts::login_form)
        .service(accounts::login)
        .service(accounts::logout)
        .service(pages::about)
        .service(pages::contact);
}
