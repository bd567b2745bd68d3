//! Transport-agnostic error type shared by services and adapters.
//!
//! Handlers never build HTTP responses by hand for failures; they return
//! [`Error`] and the inbound adapter decides the status code and page.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::TraceId;

/// Stable error codes surfaced to the HTTP adapter and to logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request failed validation.
    InvalidRequest,
    /// No authenticated user, or the credentials were wrong.
    Unauthorized,
    /// The user is authenticated but lacks the admin role.
    Forbidden,
    /// The requested record does not exist.
    NotFound,
    /// A uniqueness rule was violated.
    Conflict,
    /// A dependency such as the database is unavailable.
    ServiceUnavailable,
    /// Anything else; the message is redacted before it reaches a client.
    InternalError,
}

impl ErrorCode {
    /// Snake-case name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::ServiceUnavailable => "service_unavailable",
            Self::InternalError => "internal_error",
        }
    }
}

/// Domain error carrying a code, a user-facing message and optional details.
///
/// The trace identifier of the current request, if any, is captured when the
/// error is constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

impl Error {
    /// Build an error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Attach structured details, e.g. per-field validation messages.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Override the captured trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Error::invalid_request("x"), ErrorCode::InvalidRequest)]
    #[case(Error::unauthorized("x"), ErrorCode::Unauthorized)]
    #[case(Error::forbidden("x"), ErrorCode::Forbidden)]
    #[case(Error::not_found("x"), ErrorCode::NotFound)]
    #[case(Error::conflict("x"), ErrorCode::Conflict)]
    #[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable)]
    #[case(Error::internal("x"), ErrorCode::InternalError)]
    fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn trace_id_is_absent_outside_a_request() {
        assert!(Error::internal("boom").trace_id().is_none());
    }

    #[tokio::test]
    async fn trace_id_is_captured_inside_a_scope() {
        let trace_id: TraceId = "00000000-0000-0000-0000-000000000001"
            .parse()
            .expect("valid uuid");
        let error = TraceId::scope(trace_id, async { Error::not_found("gone") }).await;
        assert_eq!(error.trace_id(), Some("00000000-0000-0000-0000-000000000001"));
    }

    #[rstest]
    fn details_are_kept() {
        let error = Error::invalid_request("bad form").with_details(json!({"title": "required"}));
        assert_eq!(error.details(), Some(&json!({"title": "required"})));
    }

    #[rstest]
    fn display_includes_code_and_message() {
        assert_eq!(Error::conflict("taken").to_string(), "conflict: taken");
    }
}
