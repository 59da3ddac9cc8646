use std::fmt;
use std::panic::Location;

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. They appear as `code` in the
// 500 body; the human-readable message may change between releases.

/// Stable error code constants.
pub mod error_code {
    pub const MISSING_API_KEY: &str = "MISSING_API_KEY";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const ROUTE_NOT_FOUND: &str = "ROUTE_NOT_FOUND";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const METHOD_NOT_ALLOWED: &str = "METHOD_NOT_ALLOWED";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Content type sent on every response of the service.
pub const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Message for a first path segment that names no resource.
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "That resource is not available on this server.";

/// Render `body` as JSON with the service's content type.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let bytes = serde_json::to_vec(body).unwrap_or_else(|_| b"null".to_vec());
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
        bytes,
    )
        .into_response()
}

// ── Fault ───────────────────────────────────────────────────────────

/// An unrecoverable failure together with the source location that
/// converted it into a [`ServiceError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub message: String,
    pub file: &'static str,
    pub line: u32,
}

impl Fault {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(message, Location::caller())
    }

    pub fn at(message: impl Into<String>, location: &'static Location<'static>) -> Self {
        Self {
            message: message.into(),
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified service error type.
///
/// Each variant maps to a stable error code (see [`error_code`]) and an
/// HTTP status. Validation and not-found are states the caller can fix by
/// resubmitting; `Storage` and `Internal` are faults and render the
/// diagnostic `{code, message, file, line}` body.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No `X-API-Key` header. HTTP 400.
    #[error("Missing API key")]
    MissingApiKey,

    /// Key present but not recognized. HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// First path segment names no resource. HTTP 404.
    #[error("That resource is not available on this server.")]
    RouteNotFound,

    /// Known resource, unmatched identifier. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Verb not supported on this route. HTTP 405 with `Allow`.
    #[error("method not allowed, expected one of: {0}")]
    MethodNotAllowed(&'static str),

    /// Duplicate key. HTTP 409.
    #[error("{0}")]
    Conflict(String),

    /// Every failed payload rule, in evaluation order. HTTP 422.
    #[error("validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    /// Request body over the size limit, in bytes. HTTP 413.
    #[error("Request body is larger than {0} bytes")]
    PayloadTooLarge(usize),

    /// Storage backend failure. HTTP 500.
    #[error("{0}")]
    Storage(Fault),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(Fault),
}

impl ServiceError {
    #[track_caller]
    pub fn storage(message: impl Into<String>) -> Self {
        ServiceError::Storage(Fault::new(message))
    }

    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::Internal(Fault::new(message))
    }

    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::MissingApiKey => error_code::MISSING_API_KEY,
            ServiceError::Unauthorized(_) => error_code::UNAUTHENTICATED,
            ServiceError::RouteNotFound => error_code::ROUTE_NOT_FOUND,
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::MethodNotAllowed(_) => error_code::METHOD_NOT_ALLOWED,
            ServiceError::Conflict(_) => error_code::ALREADY_EXISTS,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::PayloadTooLarge(_) => error_code::PAYLOAD_TOO_LARGE,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MissingApiKey => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::RouteNotFound => StatusCode::NOT_FOUND,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The JSON body sent to the client.
    pub fn body(&self) -> serde_json::Value {
        match self {
            ServiceError::Validation(errors) => serde_json::json!({ "errors": errors }),
            ServiceError::MethodNotAllowed(allowed) => {
                serde_json::json!({ "Allowed Methods": allowed })
            }
            ServiceError::Storage(fault) | ServiceError::Internal(fault) => serde_json::json!({
                "code": self.error_code(),
                "message": fault.message,
                "file": fault.file,
                "line": fault.line,
            }),
            _ => serde_json::json!({ "message": self.to_string() }),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let mut resp = json_response(self.status_code(), &self.body());
        if let ServiceError::MethodNotAllowed(allowed) = self {
            resp.headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(allowed));
        }
        resp
    }
}
