//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie holds two things: the signed-in user id and the queue of flash
//! messages waiting for the next rendered page.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const FLASHES_KEY: &str = "_flashes";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Sign `user_id` in. The session is renewed first so a pre-login cookie
    /// cannot be replayed as an authenticated one.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_i32())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The signed-in user id. Values that do not decode are treated as
    /// signed out.
    pub fn user_id(&self) -> Option<UserId> {
        match self.0.get::<i32>(USER_ID_KEY) {
            Ok(id) => id.map(UserId::new),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                None
            }
        }
    }

    /// Drop everything, including pending flash messages.
    pub fn logout(&self) {
        self.0.purge();
    }

    /// Queue a one-time message for the next rendered page.
    pub fn flash(&self, message: impl Into<String>) -> Result<(), Error> {
        let mut pending = self.pending_flashes();
        pending.push(message.into());
        self.0
            .insert(FLASHES_KEY, pending)
            .map_err(|error| Error::internal(format!("failed to store flash message: {error}")))
    }

    /// Remove and return queued flash messages, oldest first.
    pub fn take_flashes(&self) -> Vec<String> {
        let pending = self.pending_flashes();
        if !pending.is_empty() {
            self.0.remove(FLASHES_KEY);
        }
        pending
    }

    fn pending_flashes(&self) -> Vec<String> {
        self.0
            .get::<Vec<String>>(FLASHES_KEY)
            .unwrap_or_else(|error| {
                warn!(%error, "discarding undecodable flash messages");
                None
            })
            .unwrap_or_default()
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
