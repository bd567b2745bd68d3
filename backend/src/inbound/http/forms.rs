//! Form payloads and their validation.
//!
//! Each form validates into a domain value or into an `InvalidRequest`
//! [`Error`] whose details map field names to messages. Handlers re-render
//! the form with those messages next to the inputs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

use crate::domain::{
    CommentText, DisplayName, EmailAddress, Error, IMAGE_URL_MAX, LoginCredentials,
    PlainPassword, PostDraft, PostTitle, Registration,
};

const INVALID_FORM_MESSAGE: &str = "Please correct the highlighted fields.";
const IMAGE_URL_MESSAGE: &str = "Image URL must be a valid http or https URL.";

/// Field name to message, in a stable order.
#[derive(Debug, Default)]
struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    fn record<T, E: ToString>(&mut self, field: &'static str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.0.entry(field).or_insert_with(|| error.to_string());
                None
            }
        }
    }

    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    fn into_error(self) -> Error {
        Error::invalid_request(INVALID_FORM_MESSAGE).with_details(json!({ "fields": self.0 }))
    }
}

/// Per-field messages carried by a form validation error, for templates.
pub fn field_errors(error: &Error) -> Value {
    error
        .details()
        .and_then(|details| details.get("fields"))
        .cloned()
        .unwrap_or_else(|| json!({}))
}

/// Sign-up form.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegisterForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<Registration, Error> {
        let mut errors = FieldErrors::default();
        let email = errors.record("email", EmailAddress::new(&self.email));
        let password = errors.record("password", PlainPassword::new(&self.password));
        let name = errors.record("name", DisplayName::new(&self.name));
        match (name, email, password) {
            (Some(name), Some(email), Some(password)) => {
                Ok(Registration::new(name, email, password))
            }
            _ => Err(errors.into_error()),
        }
    }
}

/// Login form.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginCredentials, Error> {
        let mut errors = FieldErrors::default();
        let email = errors.record("email", EmailAddress::new(&self.email));
        let password = errors.record("password", PlainPassword::new(&self.password));
        match (email, password) {
            (Some(email), Some(password)) => Ok(LoginCredentials::new(email, password)),
            _ => Err(errors.into_error()),
        }
    }
}

/// Create and edit post form. Interactive posts must have an image.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub subtitle: String,
    pub img_url: String,
    pub body: String,
}

impl PostForm {
    /// Validate every field, reporting all failures at once.
    pub fn validate(&self) -> Result<PostDraft, Error> {
        let mut errors = FieldErrors::default();
        let title = errors.record("title", PostTitle::new(&self.title));
        let img_url = self.img_url.trim();
        for error in PostDraft::check_fields(&self.subtitle, &self.body, img_url) {
            errors.add(error.field(), error.to_string());
        }
        if img_url.chars().count() <= IMAGE_URL_MAX && !is_web_url(img_url) {
            errors.add("img_url", IMAGE_URL_MESSAGE);
        }
        let Some(title) = title.filter(|_| errors.0.is_empty()) else {
            return Err(errors.into_error());
        };
        PostDraft::new(title, &self.subtitle, &self.body, img_url).map_err(|error| {
            errors.add(error.field(), error.to_string());
            errors.into_error()
        })
    }
}

impl From<&crate::domain::Post> for PostForm {
    fn from(post: &crate::domain::Post) -> Self {
        Self {
            title: post.title.as_str().to_owned(),
            subtitle: post.subtitle.clone(),
            img_url: post.img_url.clone(),
            body: post.body.clone(),
        }
    }
}

fn is_web_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
}

/// Comment box under a post.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CommentForm {
    pub comment: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<CommentText, Error> {
        let mut errors = FieldErrors::default();
        errors
            .record("comment", CommentText::new(&self.comment))
            .ok_or_else(|| errors.into_error())
    }
}
