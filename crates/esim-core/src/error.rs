//! # Storefront Error Types
//!
//! Typed error handling for the storefront client.
//! All API and workflow operations return `Result<T, StorefrontError>`.

use crate::validation::ValidationErrors;
use thiserror::Error;

/// Fallback shown to users when the server gave no usable message
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Core error type for all storefront operations
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Transport failure (connection refused, timeout, broken body)
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered 401; the local session has already been cleared
    #[error("Unauthorized: session is missing or expired")]
    Unauthorized,

    /// The server rejected the request for a business reason
    #[error("{message}")]
    Rejected { message: String },

    /// Any other non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Client-side validation failed; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors (bad base URL, malformed env var)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Session storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// The operation was cancelled by its owner
    #[error("Operation cancelled")]
    Cancelled,
}

impl StorefrontError {
    /// Returns true if this error is retryable at the transport layer
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorefrontError::Network(_))
    }

    /// Message suitable for showing in the page.
    ///
    /// Server rejections are surfaced verbatim, everything else degrades to
    /// `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            StorefrontError::Rejected { message } => message.clone(),
            StorefrontError::Validation(errors) => errors.to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Returns the HTTP status code associated with this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            StorefrontError::Unauthorized => Some(401),
            StorefrontError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for StorefrontError {
    fn from(errors: ValidationErrors) -> Self {
        StorefrontError::Validation(errors)
    }
}

impl From<serde_json::Error> for StorefrontError {
    fn from(err: serde_json::Error) -> Self {
        StorefrontError::Serialization(err.to_string())
    }
}

/// Result type alias for storefront operations
pub type StorefrontResult<T> = Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(StorefrontError::Network("connection refused".into()).is_retryable());
        assert!(!StorefrontError::Unauthorized.is_retryable());
        assert!(!StorefrontError::Rejected {
            message: "declined".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_user_message() {
        let rejected = StorefrontError::Rejected {
            message: "Card declined".into(),
        };
        assert_eq!(rejected.user_message("fallback"), "Card declined");

        let network = StorefrontError::Network("reset by peer".into());
        assert_eq!(network.user_message("fallback"), "fallback");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(StorefrontError::Unauthorized.status_code(), Some(401));
        assert_eq!(
            StorefrontError::Http {
                status: 502,
                message: "bad gateway".into()
            }
            .status_code(),
            Some(502)
        );
        assert_eq!(StorefrontError::Cancelled.status_code(), None);
    }
}
