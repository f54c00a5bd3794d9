//! Error types for the Sphere SDK.
//!
//! Two families are kept apart:
//! - [`TransportError`]: the send primitive failed (network, HTTP status).
//!   These go through the registered exception handlers.
//! - [`SdkError::ApiResponse`]: the server answered but reported a logical
//!   error in its payload. These are never retried.

use serde::{Deserialize, Serialize};
use sphere_query::QueryError;
use std::fmt;
use thiserror::Error;

/// Typed error codes for transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    // Network errors
    NetworkError,
    Timeout,
    ConnectionRefused,

    // Protocol errors
    HttpError,
    InvalidUrl,
    InvalidResponse,

    // Status-derived errors
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimited,
    ServerError,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::ConnectionRefused => "CONNECTION_REFUSED",
            Self::HttpError => "HTTP_ERROR",
            Self::InvalidUrl => "INVALID_URL",
            Self::InvalidResponse => "INVALID_RESPONSE",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::RateLimited => "RATE_LIMITED",
            Self::ServerError => "SERVER_ERROR",
        }
    }

    /// Maps an HTTP status code to the closest error code.
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::HttpError,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failure of the underlying send primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[{code}] {message}")]
pub struct TransportError {
    /// Typed error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// HTTP status of the failed response, when one was received.
    pub status: Option<u16>,
}

impl TransportError {
    /// Creates a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    /// Creates an error for a non-success HTTP status.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::from_status(status),
            message: message.into(),
            status: Some(status),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, message)
    }

    /// Creates a timeout error.
    pub fn timeout() -> Self {
        Self::new(ErrorCode::Timeout, "Request timed out")
    }

    /// Creates an error for a body that is not a GraphQL response.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidResponse, message)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::Timeout
        } else if err.is_connect() {
            ErrorCode::ConnectionRefused
        } else if err.is_builder() {
            ErrorCode::InvalidUrl
        } else if err.is_decode() {
            ErrorCode::InvalidResponse
        } else {
            ErrorCode::NetworkError
        };
        let status = err.status().map(|s| s.as_u16());
        Self {
            code: status.map_or(code, ErrorCode::from_status),
            message: err.to_string(),
            status,
        }
    }
}

/// Errors surfaced by the client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SdkError {
    /// A transport failure that no handler recovered from.
    #[error("unhandled transport failure: {0}")]
    UnhandledTransport(#[source] TransportError),

    /// The server reported an error inside a successful response.
    #[error("Error: {message}")]
    ApiResponse { message: String },

    /// The query could not be built.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The response did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The client is misconfigured.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SdkError {
    /// Creates a server-reported error.
    pub fn api_response(message: impl Into<String>) -> Self {
        Self::ApiResponse {
            message: message.into(),
        }
    }

    /// Returns true if this is an unrecovered transport failure.
    pub fn is_unhandled_transport(&self) -> bool {
        matches!(self, Self::UnhandledTransport(_))
    }

    /// Returns the HTTP status of the underlying transport failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnhandledTransport(err) => err.status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Type alias for SDK results.
pub type SdkResult<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_rendering() {
        let err = SdkError::api_response("Bad query");
        assert_eq!(err.to_string(), "Error: Bad query");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::from_status(401), ErrorCode::Unauthorized);
        assert_eq!(ErrorCode::from_status(403), ErrorCode::Forbidden);
        assert_eq!(ErrorCode::from_status(429), ErrorCode::RateLimited);
        assert_eq!(ErrorCode::from_status(503), ErrorCode::ServerError);
        assert_eq!(ErrorCode::from_status(418), ErrorCode::HttpError);
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::http(403, "forbidden");
        assert_eq!(err.to_string(), "[FORBIDDEN] forbidden");
        assert_eq!(err.status, Some(403));

        let wrapped = SdkError::UnhandledTransport(err);
        assert!(wrapped.is_unhandled_transport());
        assert_eq!(wrapped.status(), Some(403));
    }

    #[test]
    fn test_query_error_passthrough() {
        let err: SdkError = QueryError::PaginationFieldsOnSelectOne.into();
        assert_eq!(
            err.to_string(),
            "pagination fields can only be requested on selectAll"
        );
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::RateLimited).unwrap();
        assert_eq!(json, "\"RATE_LIMITED\"");
    }
}
