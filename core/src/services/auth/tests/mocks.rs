//! In-memory mocks for auth service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{BlacklistEntry, RefreshToken};
use crate::domain::entities::user::{User, UserRole};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{RefreshTokenRepository, TokenBlacklistRepository, UserRepository};
use crate::services::auth::password::PasswordHasher;

/// Transparent "hash" that keeps tests fast and assertions readable
pub struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash(&self, password: &str) -> DomainResult<String> {
        Ok(format!("hashed:{}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> DomainResult<bool> {
        Ok(hash == format!("hashed:{}", password))
    }
}

pub struct MockUserRepository {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
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
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
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
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }
}

pub struct MockRefreshTokenRepository {
    tokens: Arc<Mutex<HashMap<String, RefreshToken>>>,
}

impl MockRefreshTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn consume(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        Ok(self.tokens.lock().unwrap().remove(token_hash))
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

pub struct MockBlacklistRepository {
    entries: Arc<Mutex<HashMap<String, BlacklistEntry>>>,
}

impl MockBlacklistRepository {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl TokenBlacklistRepository for MockBlacklistRepository {
    async fn add(&self, entry: BlacklistEntry) -> Result<(), DomainError> {
        self.entries
            .lock()
            .unwrap()
            .entry(entry.token_identity.clone())
            .or_insert(entry);
        Ok(())
    }

    async fn contains(&self, token_identity: &str) -> Result<bool, DomainError> {
        Ok(self.entries.lock().unwrap().contains_key(token_identity))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, e| e.expires_at >= now);
        Ok(before - entries.len())
    }
}
