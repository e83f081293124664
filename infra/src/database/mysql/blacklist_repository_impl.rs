//! MySQL implementation of the TokenBlacklistRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use mm_core::domain::entities::token::BlacklistEntry;
use mm_core::errors::DomainError;
use mm_core::repositories::TokenBlacklistRepository;

/// MySQL implementation of TokenBlacklistRepository
pub struct MySqlTokenBlacklistRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenBlacklistRepository {
    /// Create a new MySQL blacklist repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenBlacklistRepository for MySqlTokenBlacklistRepository {
    async fn add(&self, entry: BlacklistEntry) -> Result<(), DomainError> {
        // INSERT IGNORE on the token_identity primary key: an existing
        // entry is left untouched, first revocation wins.
        let query = r#"
            INSERT IGNORE INTO token_blacklist (
                token_identity, reason, expires_at, created_at
            ) VALUES (?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&entry.token_identity)
            .bind(&entry.reason)
            .bind(entry.expires_at)
            .bind(entry.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to add blacklist entry: {}", e),
            })?;

        Ok(())
    }

    async fn contains(&self, token_identity: &str) -> Result<bool, DomainError> {
        let query = r#"
            SELECT EXISTS(
                SELECT 1 FROM token_blacklist WHERE token_identity = ?
            ) AS present
        "#;

        let row = sqlx::query(query)
            .bind(token_identity)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to check blacklist: {}", e),
            })?;

        let present: i64 = row.try_get("present").map_err(|e| DomainError::Storage {
            message: format!("Failed to get existence result: {}", e),
        })?;

        Ok(present == 1)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let query = "DELETE FROM token_blacklist WHERE expires_at < ?";

        let result = sqlx::query(query)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to delete expired blacklist entries: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }
}
