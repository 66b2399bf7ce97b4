//! Error types for the documentation catalog.

use restgate_core::GateError;
use thiserror::Error;

/// Errors that can occur while building or serving documentation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// A declaration could not be serialized or parsed.
    #[error("Failed to process API declaration: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// No service with this name exists.
    #[error("Service '{service}' not found.")]
    UnknownService {
        /// The requested service name.
        service: String,
    },

    /// A declaration does not describe the service it was registered for.
    #[error("Invalid API declaration for '{service}': {reason}")]
    InvalidDeclaration {
        /// The service the declaration was registered under.
        service: String,
        /// Why the declaration was rejected.
        reason: String,
    },
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;

impl From<DocsError> for GateError {
    fn from(err: DocsError) -> Self {
        match err {
            DocsError::UnknownService { service } => Self::service_not_found(service),
            DocsError::InvalidDeclaration { .. } => Self::bad_request(err.to_string()),
            DocsError::SerializationError(_) => {
                Self::internal_with_source("Failed to render API documentation.", err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restgate_core::ErrorKind;

    #[test]
    fn test_unknown_service_maps_to_not_found() {
        let err: GateError = DocsError::UnknownService {
            service: "nope".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Service 'nope' not found.");
    }

    #[test]
    fn test_serialization_error_maps_to_internal() {
        let err: DocsError = serde_json::from_str::<String>("invalid").unwrap_err().into();
        assert!(err.to_string().contains("API declaration"));

        let gate: GateError = err.into();
        assert_eq!(gate.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_invalid_declaration_message() {
        let err = DocsError::InvalidDeclaration {
            service: "db".to_string(),
            reason: "resourcePath must be '/db'".to_string(),
        };
        assert!(err.to_string().contains("'db'"));
        assert!(err.to_string().contains("resourcePath"));
    }
}
