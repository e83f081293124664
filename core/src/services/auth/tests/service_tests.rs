//! Unit tests for the authentication service.

use std::sync::Arc;

use mm_shared::config::{AuthConfig, JwtConfig};

use crate::errors::{AuthError, DomainError};
use crate::services::auth::AuthService;
use crate::services::token::TokenService;

use super::mocks::{
    FakePasswordHasher, MockBlacklistRepository, MockRefreshTokenRepository, MockUserRepository,
};

type TestAuthService = AuthService<
    MockUserRepository,
    MockRefreshTokenRepository,
    MockBlacklistRepository,
    FakePasswordHasher,
>;

fn test_config() -> AuthConfig {
    AuthConfig {
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
            issuer: "movemates".to_string(),
            audience: "movemates-api".to_string(),
        },
        default_device_label: "unknown".to_string(),
    }
}

fn create_service() -> (
    TestAuthService,
    Arc<
        TokenService<
            MockRefreshTokenRepository,
            MockBlacklistRepository,
            MockUserRepository,
        >,
    >,
) {
    let users = Arc::new(MockUserRepository::new());
    let refresh_tokens = Arc::new(MockRefreshTokenRepository::new());
    let blacklist = Arc::new(MockBlacklistRepository::new());
    let token_service = Arc::new(TokenService::new(
        refresh_tokens,
        blacklist,
        users.clone(),
        test_config(),
    ));
    let auth_service = AuthService::new(
        users,
        token_service.clone(),
        Arc::new(FakePasswordHasher),
    );
    (auth_service, token_service)
}

#[tokio::test]
async fn test_register_then_login() {
    let (auth, tokens) = create_service();

    let user = auth
        .register("rider@example.com", "hunter2!", "Rider", None)
        .await
        .unwrap();
    assert_eq!(user.email, "rider@example.com");

    let (logged_in, pair) = auth
        .login("rider@example.com", "hunter2!", "Chrome")
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);

    // The issued pair is immediately usable
    let claims = tokens.verify_access(&pair.access_token).await.unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert!(tokens
        .refresh(&pair.refresh_token, "Chrome")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (auth, _) = create_service();

    auth.register("rider@example.com", "hunter2!", "Rider", None)
        .await
        .unwrap();
    let result = auth
        .register("rider@example.com", "other-password", "Imposter", None)
        .await;

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Auth(AuthError::EmailTaken)
    ));
}

#[tokio::test]
async fn test_login_unknown_email() {
    let (auth, _) = create_service();
    let result = auth.login("nobody@example.com", "whatever", "Chrome").await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Auth(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (auth, _) = create_service();

    auth.register("rider@example.com", "hunter2!", "Rider", None)
        .await
        .unwrap();
    let result = auth.login("rider@example.com", "hunter3!", "Chrome").await;

    // Same error as an unknown email; the two cases are indistinguishable
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Auth(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_logout_kills_the_session() {
    let (auth, tokens) = create_service();

    auth.register("rider@example.com", "hunter2!", "Rider", None)
        .await
        .unwrap();
    let (_, pair) = auth
        .login("rider@example.com", "hunter2!", "Chrome")
        .await
        .unwrap();

    auth.logout(&pair.access_token, "Chrome", false).await.unwrap();

    assert!(tokens.verify_access(&pair.access_token).await.is_err());
    assert!(tokens
        .refresh(&pair.refresh_token, "Chrome")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_force_logout_clears_all_sessions() {
    let (auth, tokens) = create_service();

    let user = auth
        .register("rider@example.com", "hunter2!", "Rider", None)
        .await
        .unwrap();
    let (_, chrome) = auth
        .login("rider@example.com", "hunter2!", "Chrome")
        .await
        .unwrap();
    let (_, firefox) = auth
        .login("rider@example.com", "hunter2!", "Firefox")
        .await
        .unwrap();

    let removed = auth.force_logout(user.id).await.unwrap();
    assert_eq!(removed, 2);

    assert!(tokens
        .refresh(&chrome.refresh_token, "Chrome")
        .await
        .unwrap()
        .is_none());
    assert!(tokens
        .refresh(&firefox.refresh_token, "Firefox")
        .await
        .unwrap()
        .is_none());
}
