//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain services,
//! so tests can back it with in-memory ports.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{CommentRepository, PasswordHasher, PostRepository, UserRepository};
use crate::domain::{AuthService, ContentService, Error, Identity};

use super::session::SessionContext;
use super::views::Views;

/// Parameter object bundling the port implementations handlers depend on.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: AuthService,
    pub content: ContentService,
    pub views: Arc<Views>,
}

impl HttpState {
    /// Build the services over the given ports.
    pub fn new(ports: HttpStatePorts, views: Arc<Views>) -> Self {
        let HttpStatePorts {
            users,
            posts,
            comments,
            hasher,
            clock,
        } = ports;
        Self {
            auth: AuthService::new(users, hasher),
            content: ContentService::new(posts, comments, clock),
            views,
        }
    }

    /// Who is behind `session`.
    pub async fn identity(&self, session: &SessionContext) -> Result<Identity, Error> {
        self.auth.current_identity(session.user_id()).await
    }
}
