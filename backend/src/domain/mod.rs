//! Domain types, services and ports.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: the transport-agnostic failure type.
//! - [`User`], [`Identity`], [`Role`]: who is acting and what they may do.
//! - [`Post`], [`Comment`] and their validated inputs.
//! - [`AuthService`], [`ContentService`], [`SeedImporter`]: the use cases.
//!
//! Nothing here depends on actix or Diesel; adapters plug in through
//! [`ports`].

pub mod auth;
pub mod auth_service;
pub mod comment;
pub mod content_service;
pub mod error;
pub mod ports;
pub mod post;
pub mod seed_import;
pub mod trace_id;
pub mod user;

pub use self::auth::{HashedPassword, LoginCredentials, PlainPassword, Registration};
pub use self::auth_service::{AuthService, require_admin};
pub use self::comment::{Comment, CommentId, CommentText, CommentValidationError};
pub use self::content_service::{ContentService, PostWithComments};
pub use self::error::{Error, ErrorCode};
pub use self::post::{
    AuthorSummary, DISPLAY_DATE_FORMAT, IMAGE_URL_MAX, Post, PostDraft, PostFilter, PostId, PostTitle,
    PostValidationError, display_date,
};
pub use self::seed_import::{
    DEFAULT_SEED_FEED_URL, SEED_ACCOUNTS, SeedImportError, SeedImportOutcome, SeedImporter,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DisplayName, EmailAddress, Identity, Role, User, UserId, UserValidationError,
};
