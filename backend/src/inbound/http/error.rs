//! HTTP adapter mapping for domain errors.
//!
//! Domain failures that escape a handler become a small standalone HTML page
//! with the matching status code. Internal errors are logged and redacted.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn public_message(error: &Error) -> &str {
    if matches!(error.code(), ErrorCode::InternalError) {
        REDACTED_MESSAGE
    } else {
        error.message()
    }
}

fn error_page(status: StatusCode, message: &str, trace_id: Option<&str>) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let trace = trace_id.map_or_else(String::new, |id| {
        format!("<p class=\"trace\">Trace id: {}</p>", tera::escape_html(id))
    });
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">\
         <title>{code} {reason}</title></head>\n<body>\n<h1>{code} {reason}</h1>\n\
         <p>{message}</p>\n{trace}\n<p><a href=\"/\">Back to the blog</a></p>\n</body>\n</html>\n",
        code = status.as_u16(),
        message = tera::escape_html(message),
    )
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(
                message = self.message(),
                trace_id = self.trace_id(),
                "request failed with an internal error"
            );
        }
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder
            .content_type(ContentType::html())
            .body(error_page(status, public_message(self), self.trace_id()))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(REDACTED_MESSAGE)
    }
}
