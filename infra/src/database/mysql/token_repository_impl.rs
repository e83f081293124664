//! MySQL implementation of the RefreshTokenRepository trait.
//!
//! Refresh token records are keyed by the SHA-256 hash of the opaque
//! token value; the raw value never reaches this layer. Consumption is a
//! transactional find-and-delete so that concurrent exchanges of one
//! value cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use mm_core::domain::entities::token::RefreshToken;
use mm_core::errors::DomainError;
use mm_core::repositories::RefreshTokenRepository;

/// MySQL implementation of RefreshTokenRepository
pub struct MySqlRefreshTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepository {
    /// Create a new MySQL refresh token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Storage {
            message: format!("Failed to get id: {}", e),
        })?;

        let user_id: String = row.try_get("user_id").map_err(|e| DomainError::Storage {
            message: format!("Failed to get user_id: {}", e),
        })?;

        Ok(RefreshToken {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid token UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            token_hash: row.try_get("token_hash").map_err(|e| DomainError::Storage {
                message: format!("Failed to get token_hash: {}", e),
            })?,
            device_label: row
                .try_get("device_label")
                .map_err(|e| DomainError::Storage {
                    message: format!("Failed to get device_label: {}", e),
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Storage {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Storage {
                    message: format!("Failed to get expires_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (
                id, user_id, token_hash, device_label, created_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(&token.token_hash)
            .bind(&token.device_label)
            .bind(token.created_at)
            .bind(token.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to save refresh token: {}", e),
            })?;

        Ok(token)
    }

    async fn consume(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        // Lock the row, delete it, commit: the lookup and delete are one
        // atomic unit, so of two concurrent consumers exactly one sees
        // the row. The delete happens regardless of expiry; expiry policy
        // belongs to the caller.
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Storage {
            message: format!("Failed to start transaction: {}", e),
        })?;

        let select = r#"
            SELECT id, user_id, token_hash, device_label, created_at, expires_at
            FROM refresh_tokens
            WHERE token_hash = ?
            LIMIT 1
            FOR UPDATE
        "#;

        let row = sqlx::query(select)
            .bind(token_hash)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to look up refresh token: {}", e),
            })?;

        let token = match row {
            Some(row) => Self::row_to_token(&row)?,
            None => {
                tx.rollback().await.map_err(|e| DomainError::Storage {
                    message: format!("Failed to roll back transaction: {}", e),
                })?;
                return Ok(None);
            }
        };

        sqlx::query("DELETE FROM refresh_tokens WHERE id = ?")
            .bind(token.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to delete refresh token: {}", e),
            })?;

        tx.commit().await.map_err(|e| DomainError::Storage {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(Some(token))
    }

    async fn revoke_for_device(
        &self,
        user_id: Uuid,
        device_label: &str,
    ) -> Result<usize, DomainError> {
        let query = "DELETE FROM refresh_tokens WHERE user_id = ? AND device_label = ?";

        let result = sqlx::query(query)
            .bind(user_id.to_string())
            .bind(device_label)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to revoke device tokens: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let query = "DELETE FROM refresh_tokens WHERE user_id = ?";

        let result = sqlx::query(query)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to revoke user tokens: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let query = "DELETE FROM refresh_tokens WHERE expires_at < ?";

        let result = sqlx::query(query)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to delete expired tokens: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }
}
