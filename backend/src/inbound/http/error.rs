//! Domain errors rendered as HTTP responses.
//!
//! Client errors keep their message and details. Internal failures are
//! replaced by a fixed message once the original has been logged. The trace
//! identifier travels both in the body and in the `trace-id` header.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

/// The body a client may see for `error`.
fn client_view(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    error!(message = error.message(), "internal error hidden from client");
    let view = Error::internal(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => view.with_trace_id(id),
        None => view,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = client_view(self);
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = body.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(body)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced through a handler");
        Self::internal(REDACTED_MESSAGE)
    }
}

/// Turn an extractor rejection into a `400` carrying the domain error body.
pub(crate) fn bad_request(
    message: impl Into<String>,
    cause: &dyn std::fmt::Display,
) -> actix_web::Error {
    warn!(error = %cause, "rejected malformed request");
    Error::invalid_request(message).into()
}
