//! Refresh token repository trait: durable, exactly-once-use records.
//!
//! # Security Considerations
//! - Token values are hashed (SHA-256) before storage; the store never
//!   sees a raw value.
//! - A consumed, revoked, or swept record is deleted, never flagged:
//!   there is no path back to a consumable state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for refresh token persistence operations
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Persist a new refresh token record
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The saved record
    /// * `Err(DomainError)` - Save failed (e.g., duplicate hash)
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Atomically look up AND delete the record for `token_hash`.
    ///
    /// The lookup and delete must be a single atomic unit: two concurrent
    /// consumers of the same hash observe exactly one `Some` and one
    /// `None`. The row is returned (and deleted) even when it is already
    /// past `expires_at` - an expired record must not remain consumable;
    /// expiry policy is applied by the caller.
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - This caller won the exchange
    /// * `Ok(None)` - No record with that hash (never existed, already
    ///   consumed, or revoked)
    /// * `Err(DomainError)` - Storage failure
    async fn consume(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Delete all records for one of the user's devices (device-scoped
    /// logout)
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    async fn revoke_for_device(
        &self,
        user_id: Uuid,
        device_label: &str,
    ) -> Result<usize, DomainError>;

    /// Delete every record for the user (logout-all-devices, forced
    /// logout)
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete all records with `expires_at < now`.
    ///
    /// Safe to run concurrently with live traffic; deletes are idempotent
    /// no-ops against rows already gone. The count is for observability
    /// only.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
