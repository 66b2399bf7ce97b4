//! Error types for restgate.
//!
//! This module provides the [`GateError`] type, the single error type that
//! flows between the dispatcher and its collaborators. Every collaborator
//! call returns `Result<_, GateError>`; the dispatcher never recovers from an
//! error structurally, it only hands it to the error formatter.
//!
//! | `ErrorKind` | HTTP status |
//! |---|---|
//! | `BadRequest` | 400 |
//! | `Unauthorized` | 401 |
//! | `Forbidden` | 403 |
//! | `NotFound` | 404 |
//! | `MethodNotAllowed` | 405 |
//! | `RequestTimeout` | 408 |
//! | `Conflict` | 409 |
//! | `PayloadTooLarge` | 413 |
//! | `Internal` | 500 |
//! | `ServiceUnavailable` | 503 |
//! | `Timeout` | 504 |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`GateError`].
pub type GateResult<T> = Result<T, GateError>;

/// Kinds of errors, used to derive the response status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed request (missing identity, unknown tunneling verb, bad input).
    BadRequest,
    /// Missing or invalid credentials.
    Unauthorized,
    /// Caller is not allowed to perform the operation.
    Forbidden,
    /// Service or resource not found.
    NotFound,
    /// Verb not supported by the target.
    MethodNotAllowed,
    /// The client took too long to send the request.
    RequestTimeout,
    /// Conflicting state (e.g. resource already exists).
    Conflict,
    /// Request body over the configured limit.
    PayloadTooLarge,
    /// Internal failure in a collaborator.
    Internal,
    /// Downstream dependency is unavailable.
    ServiceUnavailable,
    /// The request did not complete within the configured timeout.
    Timeout,
}

impl ErrorKind {
    /// Returns the default HTTP status code for this error kind.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::Conflict => StatusCode::CONFLICT,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

/// Standard error type for restgate.
///
/// # Example
///
/// ```
/// use restgate_core::{ErrorKind, GateError};
///
/// fn require_name(name: &str) -> Result<(), GateError> {
///     if name.is_empty() {
///         return Err(GateError::bad_request("name cannot be empty"));
///     }
///     Ok(())
/// }
///
/// let err = require_name("").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::BadRequest);
/// ```
#[derive(Error, Debug)]
pub enum GateError {
    /// The request was malformed.
    #[error("{message}")]
    BadRequest {
        /// Human-readable error message.
        message: String,
    },

    /// Credentials are missing or invalid.
    #[error("{message}")]
    Unauthorized {
        /// Human-readable error message.
        message: String,
    },

    /// The caller may not perform the operation.
    #[error("{message}")]
    Forbidden {
        /// Human-readable error message.
        message: String,
    },

    /// A service or resource was not found.
    #[error("{message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
        /// The service or resource that was not found.
        target: Option<String>,
    },

    /// The verb is not supported by the target.
    #[error("{message}")]
    MethodNotAllowed {
        /// Human-readable error message.
        message: String,
        /// The rejected verb.
        verb: Option<String>,
    },

    /// The request body did not arrive in time.
    #[error("{message}")]
    RequestTimeout {
        /// Human-readable error message.
        message: String,
    },

    /// Conflicting state.
    #[error("{message}")]
    Conflict {
        /// Human-readable error message.
        message: String,
    },

    /// The request body exceeded the size limit.
    #[error("{message}")]
    PayloadTooLarge {
        /// Human-readable error message.
        message: String,
        /// The configured limit in bytes.
        limit: usize,
    },

    /// Internal failure.
    #[error("{message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A dependency is unavailable.
    #[error("{message}")]
    ServiceUnavailable {
        /// Human-readable error message.
        message: String,
    },

    /// Processing took longer than allowed.
    #[error("{message}")]
    Timeout {
        /// Human-readable error message.
        message: String,
    },
}

impl GateError {
    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            target: None,
        }
    }

    /// Creates a not found error naming the missing service.
    #[must_use]
    pub fn service_not_found(service: impl Into<String>) -> Self {
        let service = service.into();
        Self::NotFound {
            message: format!("Service '{service}' not found."),
            target: Some(service),
        }
    }

    /// Creates a method-not-allowed error for a verb.
    #[must_use]
    pub fn method_not_allowed(verb: impl Into<String>) -> Self {
        let verb = verb.into();
        Self::MethodNotAllowed {
            message: format!("Verb '{verb}' is not supported by this resource."),
            verb: Some(verb),
        }
    }

    /// Creates a request timeout error.
    #[must_use]
    pub fn request_timeout(message: impl Into<String>) -> Self {
        Self::RequestTimeout {
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a payload-too-large error for a body limit.
    #[must_use]
    pub fn payload_too_large(limit: usize) -> Self {
        Self::PayloadTooLarge {
            message: format!("Request body exceeds the limit of {limit} bytes."),
            limit,
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a service unavailable error.
    #[must_use]
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest { .. } => ErrorKind::BadRequest,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::MethodNotAllowed { .. } => ErrorKind::MethodNotAllowed,
            Self::RequestTimeout { .. } => ErrorKind::RequestTimeout,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            Self::Internal { .. } => ErrorKind::Internal,
            Self::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.kind().default_status_code()
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.status_code().as_u16(),
                kind: self.kind(),
                message: self.to_string(),
                details: self.error_details(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            Self::NotFound {
                target: Some(target),
                ..
            } => Some(serde_json::json!({ "target": target })),
            Self::MethodNotAllowed {
                verb: Some(verb), ..
            } => Some(serde_json::json!({ "verb": verb })),
            Self::PayloadTooLarge { limit, .. } => Some(serde_json::json!({ "limit": limit })),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        Self::bad_request(format!("Invalid JSON payload: {err}"))
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Numeric HTTP status code.
    pub code: u16,
    /// Error kind.
    pub kind: ErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
