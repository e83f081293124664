//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// A storage collaborator is unavailable or failed mid-operation.
    /// Propagated unchanged to the caller; never shown to clients.
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_error_bridges_into_domain_error() {
        let err: DomainError = TokenError::Revoked.into();
        assert!(matches!(err, DomainError::Token(TokenError::Revoked)));
        assert_eq!(err.to_string(), "Token revoked");
    }

    #[test]
    fn test_auth_error_bridges_into_domain_error() {
        let err: DomainError = AuthError::InvalidCredentials.into();
        assert!(matches!(err, DomainError::Auth(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_storage_error_message() {
        let err = DomainError::Storage {
            message: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("connection refused"));
    }
}
