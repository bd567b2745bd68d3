//! HTML rendering with Tera.
//!
//! Templates are compiled into the binary and parsed once at startup. Every
//! page receives the same base context: the current user, whether they are
//! the admin, and the flash messages drained from the session.

use std::collections::HashMap;

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use sha2::{Digest, Sha256};
use tera::{Context, Tera, Value};
use tracing::error;

use crate::domain::{Error, Identity};

const TEMPLATES: [(&str, &str); 8] = [
    ("base.html", include_str!("../../../templates/base.html")),
    ("index.html", include_str!("../../../templates/index.html")),
    ("post.html", include_str!("../../../templates/post.html")),
    ("make-post.html", include_str!("../../../templates/make-post.html")),
    ("register.html", include_str!("../../../templates/register.html")),
    ("login.html", include_str!("../../../templates/login.html")),
    ("about.html", include_str!("../../../templates/about.html")),
    ("contact.html", include_str!("../../../templates/contact.html")),
];

const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar/";
const GRAVATAR_DEFAULT_SIZE: u64 = 100;

/// Gravatar image URL for `email`, using the SHA-256 form of the hash.
pub fn gravatar_url(email: &str, size: u64) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!(
        "{GRAVATAR_BASE}{}?s={size}&d=retro&r=g",
        hex::encode(digest)
    )
}

fn gravatar_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let email = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("gravatar expects an email string"))?;
    let size = args
        .get("size")
        .and_then(Value::as_u64)
        .unwrap_or(GRAVATAR_DEFAULT_SIZE);
    Ok(Value::String(gravatar_url(email, size)))
}

/// Compiled template set.
pub struct Views {
    tera: Tera,
}

impl Views {
    /// Compile the embedded templates and register the `gravatar` filter.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        tera.register_filter("gravatar", gravatar_filter);
        Ok(Self { tera })
    }

    /// Render `template` as a `200 OK` HTML page.
    pub fn page(
        &self,
        template: &str,
        identity: &Identity,
        messages: &[String],
        mut context: Context,
    ) -> Result<HttpResponse, Error> {
        context.insert("current_user", &identity.user());
        context.insert("logged_in", &identity.is_authenticated());
        context.insert("is_admin", &identity.is_admin());
        context.insert("messages", messages);
        let body = self.tera.render(template, &context).map_err(|source| {
            error!(template, error = ?source, "template rendering failed");
            Error::internal(format!("failed to render {template}: {source}"))
        })?;
        Ok(HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body))
    }
}
