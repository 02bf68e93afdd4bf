//! Error types and handling for the router.
//!
//! Errors fall into two groups. Construction-time errors (an invalid path template,
//! a malformed method token, bad configuration) are returned from registration and
//! loading calls and are meant to stop initialization. Request-time errors are limited
//! to [`ErrorKind::RouteNotFound`], which the router turns into a `404` response itself.
//!
//! # Design
//!
//! This module uses an opaque `Error` struct paired with an `ErrorKind` enum,
//! following the `std::io::Error` pattern. Internal error sources can change without
//! breaking consumers.
//!
//! # Example
//!
//! ```rust
//! use pattern_router::{Error, ErrorKind, Router};
//!
//! let err = Router::new()
//!     .add_route("GET", "/books/{isbn", || async { "unreachable" })
//!     .unwrap_err();
//!
//! match err.kind() {
//!     ErrorKind::InvalidPattern => println!("bad template: {}", err),
//!     _ => println!("other error: {}", err),
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The kind of error that occurred.
///
/// This enum is marked `#[non_exhaustive]`, so new variants may be added
/// in future versions without breaking existing code. Always include a
/// wildcard arm when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A path template could not be compiled (unbalanced braces, bad placeholder name,
    /// duplicate placeholder, invalid literal).
    #[error("invalid path pattern")]
    InvalidPattern,

    /// A route was registered with a verb that is not a valid method token.
    #[error("invalid method")]
    InvalidMethod,

    /// No registered route matched the request method and path.
    #[error("route not found")]
    RouteNotFound,

    /// Configuration error (invalid TOML, missing values).
    #[error("configuration error")]
    Configuration,

    /// I/O error (binding the listener, reading config files).
    #[error("I/O error")]
    Io,

    /// Invalid input (bad address, header value).
    #[error("invalid input")]
    InvalidInput,
}

/// An error that can occur in the router.
///
/// Use [`Error::kind()`] to determine the category of error for matching,
/// and the `Display` implementation to get a human-readable message.
///
/// ```rust
/// use pattern_router::Error;
///
/// let err = Error::invalid_pattern("unbalanced '{' in \"/a/{b\"");
/// let err = Error::config("bind_addr is required");
/// let err = Error::route_not_found("GET", "/missing");
/// ```
pub struct Error {
    kind: ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl Error {
    /// Creates a new error with the given kind and source.
    ///
    /// ```rust
    /// use pattern_router::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::InvalidInput, "bind_addr must be an IP address");
    /// assert_eq!(err.kind(), ErrorKind::InvalidInput);
    /// ```
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            source: error.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error code string for this error.
    ///
    /// This is a stable identifier suitable for client-side error handling.
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::InvalidPattern => "INVALID_PATTERN",
            ErrorKind::InvalidMethod => "INVALID_METHOD",
            ErrorKind::RouteNotFound => "ROUTE_NOT_FOUND",
            ErrorKind::Configuration => "CONFIG_ERROR",
            ErrorKind::Io => "IO_ERROR",
            ErrorKind::InvalidInput => "INVALID_INPUT",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::InvalidPattern => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::InvalidMethod => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::RouteNotFound => StatusCode::NOT_FOUND,
            ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        }
    }

    /// Converts the error into a structured error response.
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.to_string())
    }

    /// Consumes the error and returns the inner error source.
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.source
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// Creates an invalid pattern error.
    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPattern, msg.into())
    }

    /// Creates an invalid method error.
    pub fn invalid_method(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidMethod, msg.into())
    }

    /// Creates a route-not-found error for the given method and path.
    pub fn route_not_found(method: impl fmt::Display, path: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::RouteNotFound,
            format!("No route matches {} {}", method, path),
        )
    }

    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, msg.into())
    }

    /// Creates an I/O error from a message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, msg.into())
    }

    /// Creates an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, msg.into())
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = self.to_error_response();

        if status.is_server_error() {
            tracing::error!(
                error_code = %error_response.error_code,
                message = %error_response.message,
                status = %status.as_u16(),
                "Error occurred"
            );
        } else {
            tracing::debug!(
                error_code = %error_response.error_code,
                message = %error_response.message,
                status = %status.as_u16(),
                "Request rejected"
            );
        }

        (status, Json(error_response)).into_response()
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Self::new(ErrorKind::InvalidPattern, err)
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

// ============================================================================
// ErrorResponse
// ============================================================================

/// Structured error body returned with every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Unique error code for client-side error handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
