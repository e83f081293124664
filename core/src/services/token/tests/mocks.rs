//! In-memory mock repositories for token service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{BlacklistEntry, RefreshToken};
use crate::domain::entities::user::{User, UserRole};
use crate::errors::DomainError;
use crate::repositories::{RefreshTokenRepository, TokenBlacklistRepository, UserRepository};

/// In-memory refresh token store keyed by token hash
pub struct InMemoryRefreshTokenRepository {
    tokens: Arc<Mutex<HashMap<String, RefreshToken>>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of live records (test observability)
    pub fn len(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }

    /// Whether a record exists for the hash (test observability)
    pub fn contains_hash(&self, token_hash: &str) -> bool {
        self.tokens.lock().unwrap().contains_key(token_hash)
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tokens = self.tokens.lock().unwrap();
        if tokens.contains_key(&token.token_hash) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }
        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn consume(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        // The map lookup-and-remove happens under one lock acquisition,
        // mirroring the database's atomic find-and-delete.
        let mut tokens = self.tokens.lock().unwrap();
        Ok(tokens.remove(token_hash))
    }

    async fn revoke_for_device(
        &self,
        user_id: Uuid,
        device_label: &str,
    ) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|_, t| !(t.user_id == user_id && t.device_label == device_label));
        Ok(before - tokens.len())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|_, t| t.user_id != user_id);
        Ok(before - tokens.len())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|_, t| t.expires_at >= now);
        Ok(before - tokens.len())
    }
}

/// In-memory blacklist keyed by token identity
pub struct InMemoryBlacklistRepository {
    entries: Arc<Mutex<HashMap<String, BlacklistEntry>>>,
}

impl InMemoryBlacklistRepository {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl TokenBlacklistRepository for InMemoryBlacklistRepository {
    async fn add(&self, entry: BlacklistEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.lock().unwrap();
        // First revocation wins
        entries.entry(entry.token_identity.clone()).or_insert(entry);
        Ok(())
    }

    async fn contains(&self, token_identity: &str) -> Result<bool, DomainError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.contains_key(token_identity))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, e| e.expires_at >= now);
        Ok(before - entries.len())
    }
}

/// In-memory user store
pub struct InMemoryUserRepository {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Insert a user directly, returning it (test seeding)
    pub fn seed(&self, user: User) -> User {
        let mut users = self.users.lock().unwrap();
        users.insert(user.id, user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Validation {
                message: "Email already exists".to_string(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<bool, DomainError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id) {
            Some(user) => {
                user.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().cloned().collect())
    }
}
