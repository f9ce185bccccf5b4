//! Error types for zapi
//!
//! Two layers of error live here:
//!
//! - **Error**: everything a call can fail with, from network trouble to a
//!   malformed version string (uses thiserror)
//! - **ApiError**: the wire-format error object a server returns inside an
//!   otherwise successful HTTP response
//!
//! # Telling failures apart
//!
//! Callers usually need to know *who* failed:
//!
//! - `Transport`: the request never completed (DNS, TLS, connection reset)
//! - `Encode`: the parameters could not be serialized, nothing was sent
//! - `Decode`: the server answered with something that is not a response
//!   envelope, or the result does not fit the requested type
//! - `Api`: the server understood the call and rejected it
//!
//! # Examples
//!
//! ```rust
//! use zapi_core::{ApiError, Error};
//!
//! let err = Error::Api(ApiError::new(-32602, "Invalid params.", "Incorrect method."));
//! assert_eq!(err.api_code(), Some(-32602));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for zapi operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error code a server uses for "Invalid params."
///
/// Some server versions also answer `apiinfo.version` with this code when the
/// call is made without a token.
pub const INVALID_PARAMS: i32 = -32602;

/// Error code a server uses for "Invalid JSON"
pub const PARSE_ERROR: i32 = -32700;

/// Error code for "Invalid request."
pub const INVALID_REQUEST: i32 = -32600;

/// Error code for "Method not found."
pub const METHOD_NOT_FOUND: i32 = -32601;

/// Error code for "Internal error."
pub const INTERNAL_ERROR: i32 = -32603;

/// Error code for application level failures such as "No permissions."
pub const APPLICATION_ERROR: i32 = -32500;

/// Application-level error type for zapi operations
///
/// String payloads keep the type `Clone`, so a failed call can be logged and
/// returned without fighting over ownership of the source error.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The server rejected the call
    ///
    /// Carries the decoded `error` object of the response envelope.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Network or HTTP client failure
    ///
    /// The exchange did not complete, so no response was parsed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request marshaling failed
    ///
    /// Only possible when the parameters contain values serde cannot
    /// represent as JSON. Nothing was sent.
    #[error("Encode error: {0}")]
    Encode(String),

    /// Response body is not a valid envelope, or the result does not match
    /// the requested type
    #[error("Decode error: {0}")]
    Decode(String),

    /// The response answers a different request than the one sent
    #[error("Response id mismatch: expected {expected}, got {actual}")]
    IdMismatch {
        /// Correlation id placed in the request
        expected: i32,
        /// Correlation id echoed by the server
        actual: i32,
    },

    /// A version string could not be parsed
    #[error("Invalid version string: {0}")]
    Version(String),

    /// A lookup returned a number of items other than one
    #[error("Expected exactly one result, got {0}.")]
    ExpectedOne(usize),

    /// A lookup returned fewer (or more) items than requested
    #[error("Expected {expected}, got {got}.")]
    ExpectedMore {
        /// Number of items the caller asked for
        expected: usize,
        /// Number of items the server returned
        got: usize,
    },

    /// Telemetry pipeline could not be initialized
    #[error("Observability error: {0}")]
    Observability(String),
}

impl Error {
    /// Numeric API error code, if this is an API error
    pub fn api_code(&self) -> Option<i32> {
        match self {
            Error::Api(e) => Some(e.code),
            _ => None,
        }
    }

    /// Short, stable label for the error kind, used as a metric attribute
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Api(_) => "api",
            Error::Transport(_) => "transport",
            Error::Encode(_) => "encode",
            Error::Decode(_) => "decode",
            Error::IdMismatch { .. } => "id_mismatch",
            Error::Version(_) => "version",
            Error::ExpectedOne(_) | Error::ExpectedMore { .. } => "result_count",
            Error::Observability(_) => "observability",
        }
    }
}

/// Error object carried in the `error` field of a response envelope
///
/// Servers fill `data` with the detail text, e.g. `"Incorrect user name or
/// password or account is temporarily blocked."`. A missing `data` field
/// decodes as an empty string.
///
/// # Examples
///
/// ```rust
/// use zapi_core::ApiError;
///
/// let error: ApiError = serde_json::from_str(
///     r#"{"code":-32500,"message":"Application error.","data":"No permissions."}"#,
/// ).unwrap();
/// assert_eq!(error.to_string(), "-32500 (Application error.): No permissions.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Numeric error code
    pub code: i32,
    /// Short description, e.g. "Invalid params."
    pub message: String,
    /// Detailed description
    #[serde(default)]
    pub data: String,
}

impl ApiError {
    /// Create an API error. Mostly useful for tests and mock servers.
    pub fn new(code: i32, message: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: data.into(),
        }
    }

    /// Whether this is the "Invalid params." error
    pub fn is_invalid_params(&self) -> bool {
        self.code == INVALID_PARAMS
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.message, self.data)
    }
}

impl std::error::Error for ApiError {}
