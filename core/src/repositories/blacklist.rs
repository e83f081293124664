//! Access-token blacklist repository trait.
//!
//! Holds identities of access tokens revoked before their natural expiry.
//! Consulted on every access-token verification.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::BlacklistEntry;
use crate::errors::DomainError;

/// Repository trait for blacklist entry persistence operations
#[async_trait]
pub trait TokenBlacklistRepository: Send + Sync {
    /// Record a revoked token identity. Idempotent: if an entry already
    /// exists for the identity it is left untouched - the first
    /// revocation wins, its expiry is neither extended nor shortened.
    async fn add(&self, entry: BlacklistEntry) -> Result<(), DomainError>;

    /// Existence check for a token identity.
    ///
    /// Entry expiry is handled solely by the sweep; this predicate does
    /// not filter on `expires_at`.
    async fn contains(&self, token_identity: &str) -> Result<bool, DomainError>;

    /// Delete entries with `expires_at < now`. The matching access tokens
    /// are already rejected by their own expiry check, so this only
    /// reclaims storage.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
