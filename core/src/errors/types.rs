//! Domain-specific error types for authentication and token operations
//!
//! Error messages here are internal; the presentation layer decides what
//! reaches the client.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

/// Token-related errors
///
/// Cryptographic and parsing failures (`Malformed`, `Expired`,
/// `InvalidSignature`) are resolved without touching storage; `Revoked`
/// requires a blacklist lookup on an otherwise-valid token.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token expired")]
    Expired,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token revoked")]
    Revoked,

    #[error("Refresh token not found")]
    NotFound,

    #[error("Missing access token")]
    MissingToken,

    #[error("Invalid access token")]
    InvalidToken,

    #[error("Failed to blacklist token")]
    BlacklistFailure,

    #[error("Token generation failed")]
    GenerationFailed,
}
