//! Mapping from domain errors to HTTP responses.
//!
//! Internal error detail is logged here and never reaches the client:
//! storage and internal failures all surface as a generic 500 body.

use actix_web::HttpResponse;
use validator::ValidationErrors;

use mm_core::errors::{AuthError, DomainError, TokenError};

use crate::dto::ErrorResponse;

/// Convert a domain error into the appropriate HTTP response
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Token(token_error) => handle_token_error(token_error),
        DomainError::Auth(auth_error) => handle_auth_error(auth_error),
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(ErrorResponse::new("validation_error", message))
        }
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(ErrorResponse::new(
            "not_found",
            format!("{} not found", resource),
        )),
        DomainError::Storage { .. } | DomainError::Internal { .. } => {
            tracing::error!("Internal error: {:?}", error);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("internal_error", "An internal error occurred"))
        }
    }
}

fn handle_token_error(error: &TokenError) -> HttpResponse {
    match error {
        TokenError::MissingToken => HttpResponse::BadRequest()
            .json(ErrorResponse::new("missing_token", "Access token is required")),
        TokenError::Malformed
        | TokenError::Expired
        | TokenError::InvalidSignature
        | TokenError::Revoked
        | TokenError::NotFound
        | TokenError::InvalidToken => HttpResponse::Unauthorized()
            .json(ErrorResponse::new("invalid_token", "Invalid or expired token")),
        TokenError::BlacklistFailure | TokenError::GenerationFailed => {
            tracing::error!("Token subsystem failure: {:?}", error);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("internal_error", "An internal error occurred"))
        }
    }
}

fn handle_auth_error(error: &AuthError) -> HttpResponse {
    match error {
        AuthError::InvalidCredentials => HttpResponse::Unauthorized().json(ErrorResponse::new(
            "invalid_credentials",
            "Invalid email or password",
        )),
        AuthError::UserNotFound => {
            HttpResponse::NotFound().json(ErrorResponse::new("not_found", "User not found"))
        }
        AuthError::EmailTaken => HttpResponse::Conflict().json(ErrorResponse::new(
            "email_taken",
            "An account with this email already exists",
        )),
        AuthError::InsufficientPermissions => {
            HttpResponse::Forbidden().json(ErrorResponse::new("forbidden", "Access forbidden"))
        }
    }
}

/// Convert request DTO validation failures into a 400 response
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
    HttpResponse::BadRequest().json(ErrorResponse::new(
        "validation_error",
        format!("Invalid request data: {}", fields.join(", ")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_token_errors_map_to_unauthorized() {
        for error in [
            TokenError::Malformed,
            TokenError::Expired,
            TokenError::InvalidSignature,
            TokenError::Revoked,
            TokenError::InvalidToken,
        ] {
            let response = handle_domain_error(&DomainError::Token(error));
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_missing_token_is_bad_request() {
        let response = handle_domain_error(&DomainError::Token(TokenError::MissingToken));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_blacklist_failure_is_server_fault() {
        let response = handle_domain_error(&DomainError::Token(TokenError::BlacklistFailure));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_email_taken_is_conflict() {
        let response = handle_domain_error(&DomainError::Auth(AuthError::EmailTaken));
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_storage_errors_stay_generic() {
        let response = handle_domain_error(&DomainError::Storage {
            message: "connection refused to db-host:3306".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
