//! Main token service implementation: issuance, verification, rotation,
//! revocation, and sweep orchestration.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use mm_shared::config::AuthConfig;

use crate::domain::entities::token::{BlacklistEntry, Claims, RefreshToken, TokenPair};
use crate::domain::entities::user::UserRole;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::{RefreshTokenRepository, TokenBlacklistRepository, UserRepository};

use super::signer::JwtSigner;

/// Number of characters in a raw refresh token value (~190 bits of
/// entropy over the alphanumeric alphabet)
const REFRESH_TOKEN_LENGTH: usize = 32;

const REFRESH_TOKEN_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Service orchestrating the access/refresh token lifecycle.
///
/// All coordination happens through the backing stores' transactional
/// guarantees; the service itself holds no mutable state.
pub struct TokenService<R, B, U>
where
    R: RefreshTokenRepository,
    B: TokenBlacklistRepository,
    U: UserRepository,
{
    refresh_tokens: Arc<R>,
    blacklist: Arc<B>,
    users: Arc<U>,
    signer: JwtSigner,
    config: AuthConfig,
}

impl<R, B, U> TokenService<R, B, U>
where
    R: RefreshTokenRepository,
    B: TokenBlacklistRepository,
    U: UserRepository,
{
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `refresh_tokens` - Store for single-use refresh token records
    /// * `blacklist` - Store for revoked access-token identities
    /// * `users` - User record store, consulted on refresh
    /// * `config` - Authentication configuration (secret, lifetimes)
    pub fn new(refresh_tokens: Arc<R>, blacklist: Arc<B>, users: Arc<U>, config: AuthConfig) -> Self {
        let signer = JwtSigner::new(config.jwt.clone());
        Self {
            refresh_tokens,
            blacklist,
            users,
            signer,
            config,
        }
    }

    /// Issues a new access/refresh token pair for a user session.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Signed access token, raw refresh value, and
    ///   the access-token lifetime in seconds
    /// * `Err(DomainError)` - Signing or storage failure
    pub async fn issue_pair(
        &self,
        user_id: Uuid,
        email: &str,
        role: UserRole,
        device_label: &str,
    ) -> DomainResult<TokenPair> {
        let access_token = self.signer.sign(user_id, email, role)?;

        let refresh_value = generate_refresh_value();
        let record = RefreshToken::new(
            user_id,
            hash_token(&refresh_value),
            self.device_or_default(device_label),
            Duration::seconds(self.config.jwt.refresh_token_expiry),
        );
        self.refresh_tokens.save(record).await?;

        Ok(TokenPair::new(
            access_token,
            refresh_value,
            self.config.jwt.access_token_expiry,
        ))
    }

    /// Verifies an access token: cryptographic checks first, then the
    /// blacklist.
    ///
    /// Cryptographic failures are surfaced immediately without touching
    /// storage - the cheap rejection short-circuits before the round-trip.
    /// A blacklisted identity fails with `Revoked` even though signature
    /// and expiry are valid.
    pub async fn verify_access(&self, token: &str) -> DomainResult<Claims> {
        let claims = self.signer.verify(token)?;

        if self.blacklist.contains(&claims.jti).await? {
            return Err(DomainError::Token(TokenError::Revoked));
        }

        Ok(claims)
    }

    /// Exchanges a refresh token for a new pair (rotation-on-use).
    ///
    /// Returns `Ok(None)` for an unknown, already-consumed, or expired
    /// value - the cases are deliberately indistinguishable to the caller
    /// so a client cannot probe whether a value ever existed. The old
    /// record is deleted before the new pair is created: a crash in
    /// between leaves a dead session requiring re-login, never a second
    /// valid pair.
    ///
    /// The owning user's current email and role are re-read from the user
    /// store, so role changes take effect at the next rotation.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        device_label: &str,
    ) -> DomainResult<Option<TokenPair>> {
        let token_hash = hash_token(refresh_token);

        let record = match self.refresh_tokens.consume(&token_hash).await? {
            Some(record) => record,
            None => return Ok(None),
        };

        // The expired record was deleted by consume; it must not remain
        // consumable.
        if record.is_expired() {
            return Ok(None);
        }

        let user = match self.users.find_by_id(record.user_id).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        let pair = self
            .issue_pair(user.id, &user.email, user.role, device_label)
            .await?;

        Ok(Some(pair))
    }

    /// Blacklists an access token by its embedded identity.
    ///
    /// The token is decoded without signature verification so that a
    /// caller logging out can revoke a token that is already expired or
    /// otherwise unverifiable; the decoded identity is only written to
    /// the blacklist, never trusted for access control.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Identity blacklisted until the token's own expiry
    /// * `Ok(false)` - Identity or expiry could not be read from the token
    /// * `Err(DomainError)` - Blacklist storage failure
    pub async fn revoke_access_token(&self, token: &str, reason: &str) -> DomainResult<bool> {
        let claims = match self.signer.decode_unverified(token) {
            Some(claims) => claims,
            None => return Ok(false),
        };

        let expires_at = match claims.expires_at() {
            Some(expires_at) => expires_at,
            None => return Ok(false),
        };

        // The entry carries the token's own expiry: it self-expires
        // exactly when the token would have anyway.
        let entry = BlacklistEntry::new(claims.jti, reason.to_string(), expires_at);
        self.blacklist.add(entry).await?;

        Ok(true)
    }

    /// Logs a session out: blacklists the presented access token and
    /// deletes the user's refresh tokens for one device or for all.
    ///
    /// # Errors
    ///
    /// * `TokenError::MissingToken` - Empty token value
    /// * `TokenError::InvalidToken` - The token's identity cannot be read
    /// * `TokenError::BlacklistFailure` - Revocation could not be
    ///   recorded (server fault, not client fault)
    pub async fn logout(
        &self,
        access_token: &str,
        device_label: &str,
        all_devices: bool,
    ) -> DomainResult<()> {
        if access_token.trim().is_empty() {
            return Err(DomainError::Token(TokenError::MissingToken));
        }

        let claims = self
            .signer
            .decode_unverified(access_token)
            .ok_or(DomainError::Token(TokenError::InvalidToken))?;
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidToken))?;

        match self.revoke_access_token(access_token, "User logout").await {
            Ok(true) => {}
            Ok(false) | Err(_) => {
                return Err(DomainError::Token(TokenError::BlacklistFailure));
            }
        }

        if all_devices {
            self.refresh_tokens.revoke_all_for_user(user_id).await?;
        } else {
            self.refresh_tokens
                .revoke_for_device(user_id, &self.device_or_default(device_label))
                .await?;
        }

        Ok(())
    }

    /// Administrative forced logout: deletes every refresh token for the
    /// user.
    ///
    /// Already-issued access tokens are not retroactively blacklisted and
    /// keep working until natural expiry - a window bounded by the
    /// access-token lifetime, accepted as stated policy.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of refresh tokens removed
    pub async fn invalidate_all_user_tokens(&self, user_id: Uuid) -> DomainResult<usize> {
        self.refresh_tokens.revoke_all_for_user(user_id).await
    }

    /// Removes expired refresh tokens and blacklist entries.
    ///
    /// Idempotent and safe on any schedule; expired rows are already
    /// functionally inert, so this only reclaims storage.
    ///
    /// # Returns
    ///
    /// * `Ok((refresh_deleted, blacklist_deleted))` - Counts, for
    ///   observability only
    pub async fn cleanup_expired(&self) -> DomainResult<(usize, usize)> {
        let now = Utc::now();
        let refresh_deleted = self.refresh_tokens.delete_expired(now).await?;
        let blacklist_deleted = self.blacklist.delete_expired(now).await?;
        Ok((refresh_deleted, blacklist_deleted))
    }

    fn device_or_default(&self, device_label: &str) -> String {
        if device_label.trim().is_empty() {
            self.config.default_device_label.clone()
        } else {
            device_label.to_string()
        }
    }
}

/// Hashes a refresh token value for storage lookup
pub(crate) fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates an unguessable opaque refresh token value
fn generate_refresh_value() -> String {
    let mut rng = rand::thread_rng();
    (0..REFRESH_TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..REFRESH_TOKEN_CHARSET.len());
            REFRESH_TOKEN_CHARSET[idx] as char
        })
        .collect()
}
