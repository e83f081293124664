//! Main authentication service implementation.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{RefreshTokenRepository, TokenBlacklistRepository, UserRepository};
use crate::services::token::TokenService;

use super::password::PasswordHasher;

/// A structurally valid bcrypt hash that matches no password. Verified
/// against when the email is unknown so both rejection paths pay the
/// same bcrypt cost.
const DUMMY_PASSWORD_HASH: &str = "$2b$12$C6UzMDM.H6dfI/f/IKcEeO7ZK0Cq8lP1bIz8kH7q1uQO3O7uGmEpa";

/// Authentication service for credential-based login and session
/// management
pub struct AuthService<U, R, B, P>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    B: TokenBlacklistRepository,
    P: PasswordHasher,
{
    /// User repository for account lookups
    users: Arc<U>,
    /// Token service for the session lifecycle
    token_service: Arc<TokenService<R, B, U>>,
    /// Password hashing collaborator
    password_hasher: Arc<P>,
}

impl<U, R, B, P> AuthService<U, R, B, P>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    B: TokenBlacklistRepository,
    P: PasswordHasher,
{
    /// Create a new authentication service
    pub fn new(
        users: Arc<U>,
        token_service: Arc<TokenService<R, B, U>>,
        password_hasher: Arc<P>,
    ) -> Self {
        Self {
            users,
            token_service,
            password_hasher,
        }
    }

    /// Register a new account with the `user` role.
    ///
    /// # Errors
    ///
    /// * `AuthError::EmailTaken` - An account already exists for the email
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        phone: Option<String>,
    ) -> DomainResult<User> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(DomainError::Auth(AuthError::EmailTaken));
        }

        let password_hash = self.password_hasher.hash(password)?;
        let user =
            User::new(email.to_string(), password_hash, name.to_string()).with_phone(phone);

        self.users.create(user).await
    }

    /// Authenticate with email and password; on success issue a token
    /// pair scoped to the calling device.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        device_label: &str,
    ) -> DomainResult<(User, TokenPair)> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                let _ = self.password_hasher.verify(password, DUMMY_PASSWORD_HASH);
                return Err(DomainError::Auth(AuthError::InvalidCredentials));
            }
        };

        if !self.password_hasher.verify(password, &user.password_hash)? {
            return Err(DomainError::Auth(AuthError::InvalidCredentials));
        }

        let pair = self
            .token_service
            .issue_pair(user.id, &user.email, user.role, device_label)
            .await?;

        Ok((user, pair))
    }

    /// Log out the session presenting `access_token`; see
    /// [`TokenService::logout`]
    pub async fn logout(
        &self,
        access_token: &str,
        device_label: &str,
        all_devices: bool,
    ) -> DomainResult<()> {
        self.token_service
            .logout(access_token, device_label, all_devices)
            .await
    }

    /// Administrative forced logout for a user
    pub async fn force_logout(&self, user_id: Uuid) -> DomainResult<usize> {
        self.token_service.invalidate_all_user_tokens(user_id).await
    }
}
