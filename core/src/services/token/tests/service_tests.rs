//! Unit tests for the token service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use mm_shared::config::{AuthConfig, JwtConfig};

use crate::domain::entities::token::{BlacklistEntry, RefreshToken, TokenPair};
use crate::domain::entities::user::{User, UserRole};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{RefreshTokenRepository, TokenBlacklistRepository, UserRepository};
use crate::services::token::service::hash_token;
use crate::services::token::TokenService;

use super::mocks::{
    InMemoryBlacklistRepository, InMemoryRefreshTokenRepository, InMemoryUserRepository,
};

type TestTokenService = TokenService<
    InMemoryRefreshTokenRepository,
    InMemoryBlacklistRepository,
    InMemoryUserRepository,
>;

struct TestHarness {
    service: TestTokenService,
    refresh_tokens: Arc<InMemoryRefreshTokenRepository>,
    blacklist: Arc<InMemoryBlacklistRepository>,
    users: Arc<InMemoryUserRepository>,
}

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

fn create_harness() -> TestHarness {
    let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::new());
    let blacklist = Arc::new(InMemoryBlacklistRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let service = TokenService::new(
        refresh_tokens.clone(),
        blacklist.clone(),
        users.clone(),
        test_config(),
    );
    TestHarness {
        service,
        refresh_tokens,
        blacklist,
        users,
    }
}

fn seed_user(harness: &TestHarness) -> User {
    harness.users.seed(User::new(
        "rider@example.com".to_string(),
        "$2b$12$hash".to_string(),
        "Rider".to_string(),
    ))
}

async fn issue_for(harness: &TestHarness, user: &User, device: &str) -> TokenPair {
    harness
        .service
        .issue_pair(user.id, &user.email, user.role, device)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_issue_then_verify_round_trip() {
    let harness = create_harness();
    let user = seed_user(&harness);

    let pair = issue_for(&harness, &user, "Chrome").await;
    assert!(!pair.access_token.is_empty());
    assert!(!pair.refresh_token.is_empty());
    assert_eq!(pair.expires_in, 900);

    let claims = harness.service.verify_access(&pair.access_token).await.unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.email, user.email);
    assert_eq!(claims.role, "user");
}

#[tokio::test]
async fn test_issuance_has_no_blacklist_side_effect() {
    let harness = create_harness();
    let user = seed_user(&harness);

    let pair = issue_for(&harness, &user, "Chrome").await;
    let claims = harness.service.verify_access(&pair.access_token).await.unwrap();
    assert!(!harness.blacklist.contains(&claims.jti).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_refresh_exactly_one_wins() {
    let harness = create_harness();
    let user = seed_user(&harness);
    let pair = issue_for(&harness, &user, "Chrome").await;

    let (a, b) = tokio::join!(
        harness.service.refresh(&pair.refresh_token, "Chrome"),
        harness.service.refresh(&pair.refresh_token, "Chrome"),
    );

    let successes = [a.unwrap(), b.unwrap()]
        .into_iter()
        .filter(Option::is_some)
        .count();
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_revoked_access_token_fails_verification() {
    let harness = create_harness();
    let user = seed_user(&harness);
    let pair = issue_for(&harness, &user, "Chrome").await;

    // Cryptographically the token is still valid and unexpired
    harness.service.verify_access(&pair.access_token).await.unwrap();

    let revoked = harness
        .service
        .revoke_access_token(&pair.access_token, "User logout")
        .await
        .unwrap();
    assert!(revoked);

    let result = harness.service.verify_access(&pair.access_token).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::Revoked)
    ));
}

#[tokio::test]
async fn test_revoke_unparseable_token_returns_false() {
    let harness = create_harness();
    let revoked = harness
        .service
        .revoke_access_token("not-a-jwt", "User logout")
        .await
        .unwrap();
    assert!(!revoked);
}

#[tokio::test]
async fn test_consumed_refresh_token_is_rejected_on_replay() {
    let harness = create_harness();
    let user = seed_user(&harness);
    let pair = issue_for(&harness, &user, "Chrome").await;

    let first = harness.service.refresh(&pair.refresh_token, "Chrome").await.unwrap();
    assert!(first.is_some());

    // Replaying the same value must observe nothing
    let second = harness.service.refresh(&pair.refresh_token, "Chrome").await.unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn test_rotation_scenario_old_value_dies_new_value_works() {
    let harness = create_harness();
    let user = seed_user(&harness);
    let pair = issue_for(&harness, &user, "Chrome").await;

    let rotated = harness
        .service
        .refresh(&pair.refresh_token, "Chrome")
        .await
        .unwrap()
        .expect("first exchange should succeed");
    assert_ne!(rotated.refresh_token, pair.refresh_token);

    // The original value is spent
    assert!(harness
        .service
        .refresh(&pair.refresh_token, "Chrome")
        .await
        .unwrap()
        .is_none());

    // The rotated value is live, once
    assert!(harness
        .service
        .refresh(&rotated.refresh_token, "Chrome")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_refresh_rereads_current_role() {
    let harness = create_harness();
    let user = seed_user(&harness);
    let pair = issue_for(&harness, &user, "Chrome").await;

    harness
        .users
        .update_role(user.id, UserRole::Driver)
        .await
        .unwrap();

    let rotated = harness
        .service
        .refresh(&pair.refresh_token, "Chrome")
        .await
        .unwrap()
        .unwrap();

    let claims = harness.service.verify_access(&rotated.access_token).await.unwrap();
    assert_eq!(claims.role, "driver");
}

#[tokio::test]
async fn test_expired_refresh_record_is_rejected_and_deleted() {
    let harness = create_harness();
    let user = seed_user(&harness);

    let raw_value = "expired-refresh-token-value-00001";
    let mut record = RefreshToken::new(
        user.id,
        hash_token(raw_value),
        "Chrome".to_string(),
        Duration::days(7),
    );
    record.expires_at = Utc::now() - Duration::hours(1);
    harness.refresh_tokens.save(record).await.unwrap();

    // Expired and missing values are indistinguishable to the caller
    let result = harness.service.refresh(raw_value, "Chrome").await.unwrap();
    assert!(result.is_none());

    // The expired record did not survive the exchange attempt
    assert!(!harness.refresh_tokens.contains_hash(&hash_token(raw_value)));
}

#[tokio::test]
async fn test_refresh_for_deleted_user_returns_none() {
    let harness = create_harness();
    // Not seeded into the user store
    let ghost = User::new(
        "ghost@example.com".to_string(),
        "hash".to_string(),
        "Ghost".to_string(),
    );

    let pair = issue_for(&harness, &ghost, "Chrome").await;
    let result = harness.service.refresh(&pair.refresh_token, "Chrome").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_device_scoped_logout_spares_other_devices() {
    let harness = create_harness();
    let user = seed_user(&harness);

    let chrome = issue_for(&harness, &user, "Chrome").await;
    let firefox = issue_for(&harness, &user, "Firefox").await;

    harness
        .service
        .logout(&chrome.access_token, "Chrome", false)
        .await
        .unwrap();

    // Chrome's refresh token is gone; Firefox's session survives
    assert!(harness
        .service
        .refresh(&chrome.refresh_token, "Chrome")
        .await
        .unwrap()
        .is_none());
    assert!(harness
        .service
        .refresh(&firefox.refresh_token, "Firefox")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_all_devices_logout_removes_every_session() {
    let harness = create_harness();
    let user = seed_user(&harness);

    let chrome = issue_for(&harness, &user, "Chrome").await;
    let firefox = issue_for(&harness, &user, "Firefox").await;

    harness
        .service
        .logout(&chrome.access_token, "Chrome", true)
        .await
        .unwrap();

    assert!(harness
        .service
        .refresh(&chrome.refresh_token, "Chrome")
        .await
        .unwrap()
        .is_none());
    assert!(harness
        .service
        .refresh(&firefox.refresh_token, "Firefox")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_logout_blacklists_the_presented_access_token() {
    let harness = create_harness();
    let user = seed_user(&harness);
    let pair = issue_for(&harness, &user, "Chrome").await;

    harness
        .service
        .logout(&pair.access_token, "Chrome", false)
        .await
        .unwrap();

    let result = harness.service.verify_access(&pair.access_token).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::Revoked)
    ));
}

#[tokio::test]
async fn test_logout_with_missing_token() {
    let harness = create_harness();
    let result = harness.service.logout("", "Chrome", false).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::MissingToken)
    ));
}

#[tokio::test]
async fn test_logout_with_undecodable_token() {
    let harness = create_harness();
    let result = harness.service.logout("garbage", "Chrome", false).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::InvalidToken)
    ));
}

#[tokio::test]
async fn test_force_logout_leaves_access_tokens_until_expiry() {
    let harness = create_harness();
    let user = seed_user(&harness);

    let chrome = issue_for(&harness, &user, "Chrome").await;
    let firefox = issue_for(&harness, &user, "Firefox").await;

    let removed = harness
        .service
        .invalidate_all_user_tokens(user.id)
        .await
        .unwrap();
    assert_eq!(removed, 2);

    // Refresh tokens are dead immediately
    assert!(harness
        .service
        .refresh(&chrome.refresh_token, "Chrome")
        .await
        .unwrap()
        .is_none());

    // Outstanding access tokens ride out their natural lifetime
    assert!(harness.service.verify_access(&firefox.access_token).await.is_ok());
}

#[tokio::test]
async fn test_cleanup_sweeps_both_stores() {
    let harness = create_harness();
    let user = seed_user(&harness);

    // One expired refresh token
    let mut stale_token = RefreshToken::new(
        user.id,
        hash_token("stale-token-value"),
        "Chrome".to_string(),
        Duration::days(7),
    );
    stale_token.expires_at = Utc::now() - Duration::seconds(1);
    harness.refresh_tokens.save(stale_token).await.unwrap();

    // One expired blacklist entry
    let stale_identity = Uuid::new_v4().to_string();
    harness
        .blacklist
        .add(BlacklistEntry::new(
            stale_identity.clone(),
            "User logout".to_string(),
            Utc::now() - Duration::seconds(1),
        ))
        .await
        .unwrap();

    // And one live record in each store
    let live = issue_for(&harness, &user, "Firefox").await;
    harness
        .service
        .revoke_access_token(&live.access_token, "User logout")
        .await
        .unwrap();

    let (refresh_deleted, blacklist_deleted) = harness.service.cleanup_expired().await.unwrap();
    assert_eq!(refresh_deleted, 1);
    assert_eq!(blacklist_deleted, 1);

    // The swept identity no longer registers as revoked
    assert!(!harness.blacklist.contains(&stale_identity).await.unwrap());
    // The live session is untouched
    assert_eq!(harness.refresh_tokens.len(), 1);
}

#[tokio::test]
async fn test_blank_device_label_falls_back_to_default() {
    let harness = create_harness();
    let user = seed_user(&harness);

    let pair = issue_for(&harness, &user, "").await;

    // Logging out the default-labelled device kills the session
    harness
        .service
        .logout(&pair.access_token, "", false)
        .await
        .unwrap();
    assert!(harness
        .service
        .refresh(&pair.refresh_token, "unknown")
        .await
        .unwrap()
        .is_none());
}
