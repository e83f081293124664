//! JWT authentication middleware for protecting API endpoints.
//!
//! Extracts the bearer token from the Authorization header, runs the full
//! access-token verification (cryptographic checks and the revocation
//! blacklist) through the token service, and injects the authenticated
//! user context into the request.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    str::FromStr,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use mm_core::domain::entities::token::Claims;
use mm_core::domain::entities::user::UserRole;
use mm_core::errors::{AuthError, DomainError, DomainResult, TokenError};
use mm_core::repositories::{RefreshTokenRepository, TokenBlacklistRepository, UserRepository};
use mm_core::services::token::TokenService;

/// User authentication context injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID extracted from JWT claims
    pub user_id: Uuid,
    /// Email at token issuance time
    pub email: String,
    /// Role at token issuance time
    pub role: UserRole,
    /// JWT ID for tracking
    pub jti: String,
}

impl AuthContext {
    /// Creates a new authentication context from JWT claims
    pub fn from_claims(claims: Claims) -> Result<Self, DomainError> {
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::Malformed))?;
        let role = UserRole::from_str(&claims.role)
            .map_err(|_| DomainError::Token(TokenError::Malformed))?;
        Ok(Self {
            user_id,
            email: claims.email,
            role,
            jti: claims.jti,
        })
    }

    /// Whether the caller holds the admin role
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Fail with `InsufficientPermissions` unless the caller is an admin
    pub fn require_admin(&self) -> Result<(), DomainError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Auth(AuthError::InsufficientPermissions))
        }
    }
}

/// Trait object seam so the middleware can verify tokens without knowing
/// the concrete repository types behind the token service
#[async_trait]
pub trait AccessTokenVerifier: Send + Sync {
    async fn verify_access(&self, token: &str) -> DomainResult<Claims>;
}

#[async_trait]
impl<R, B, U> AccessTokenVerifier for TokenService<R, B, U>
where
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    U: UserRepository + 'static,
{
    async fn verify_access(&self, token: &str) -> DomainResult<Claims> {
        TokenService::verify_access(self, token).await
    }
}

/// JWT authentication middleware factory
pub struct JwtAuth;

impl JwtAuth {
    /// Creates a new JWT authentication middleware
    pub fn new() -> Self {
        Self
    }
}

impl Default for JwtAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Extract token from Authorization header
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    return Err(ErrorUnauthorized("Missing or invalid Authorization header"));
                }
            };

            let verifier = req
                .app_data::<web::Data<Arc<dyn AccessTokenVerifier>>>()
                .cloned();

            let auth_context = match verifier {
                Some(verifier) => match verifier.verify_access(&token).await {
                    Ok(claims) => match AuthContext::from_claims(claims) {
                        Ok(context) => context,
                        Err(e) => return Err(ErrorUnauthorized(format!("Invalid token: {}", e))),
                    },
                    Err(e) => {
                        return Err(ErrorUnauthorized(format!(
                            "Token verification failed: {}",
                            e
                        )))
                    }
                },
                None => return Err(ErrorUnauthorized("Token verification not configured")),
            };

            // Inject auth context into request extensions
            req.extensions_mut().insert(auth_context);

            // Continue with the request
            service.call(req).await
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_extract_bearer_token() {
        use actix_web::test;

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();

        assert_eq!(extract_bearer_token(&req), Some("test_token_123".to_string()));

        let req_no_bearer = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();

        assert_eq!(extract_bearer_token(&req_no_bearer), None);

        let req_no_header = test::TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }

    #[test]
    fn test_auth_context_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new_access_token(
            user_id,
            "admin@movemates.co.za".to_string(),
            UserRole::Admin,
            Duration::minutes(15),
            "movemates",
            "movemates-api",
        );

        let context = AuthContext::from_claims(claims).unwrap();
        assert_eq!(context.user_id, user_id);
        assert!(context.is_admin());
        assert!(context.require_admin().is_ok());
    }

    #[test]
    fn test_auth_context_rejects_unknown_role() {
        let mut claims = Claims::new_access_token(
            Uuid::new_v4(),
            "rider@example.com".to_string(),
            UserRole::User,
            Duration::minutes(15),
            "movemates",
            "movemates-api",
        );
        claims.role = "superuser".to_string();

        assert!(AuthContext::from_claims(claims).is_err());
    }

    #[test]
    fn test_non_admin_is_forbidden() {
        let claims = Claims::new_access_token(
            Uuid::new_v4(),
            "rider@example.com".to_string(),
            UserRole::User,
            Duration::minutes(15),
            "movemates",
            "movemates-api",
        );
        let context = AuthContext::from_claims(claims).unwrap();
        assert!(context.require_admin().is_err());
    }
}
