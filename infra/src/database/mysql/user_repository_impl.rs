//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use mm_core::domain::entities::user::{User, UserRole};
use mm_core::errors::DomainError;
use mm_core::repositories::UserRepository;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Storage {
            message: format!("Failed to get id: {}", e),
        })?;

        let role: String = row.try_get("role").map_err(|e| DomainError::Storage {
            message: format!("Failed to get role: {}", e),
        })?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            email: row.try_get("email").map_err(|e| DomainError::Storage {
                message: format!("Failed to get email: {}", e),
            })?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| DomainError::Storage {
                    message: format!("Failed to get password_hash: {}", e),
                })?,
            name: row.try_get("name").map_err(|e| DomainError::Storage {
                message: format!("Failed to get name: {}", e),
            })?,
            role: role.parse::<UserRole>().map_err(|e| DomainError::Internal {
                message: format!("Invalid role: {}", e),
            })?,
            phone: row.try_get("phone").map_err(|e| DomainError::Storage {
                message: format!("Failed to get phone: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Storage {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Storage {
                    message: format!("Failed to get updated_at: {}", e),
                })?,
        })
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, name, role, phone, created_at, updated_at";

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, email, password_hash, name, role, phone, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(user.role.to_string())
            .bind(&user.phone)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to create user: {}", e),
            })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = ? LIMIT 1", USER_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to find user by id: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE email = ? LIMIT 1", USER_COLUMNS);

        let result = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to find user by email: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<bool, DomainError> {
        let query = "UPDATE users SET role = ?, updated_at = ? WHERE id = ?";

        let result = sqlx::query(query)
            .bind(role.to_string())
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to update user role: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let query = format!("SELECT {} FROM users ORDER BY created_at DESC", USER_COLUMNS);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to list users: {}", e),
            })?;

        let mut users = Vec::new();
        for row in rows {
            users.push(Self::row_to_user(&row)?);
        }

        Ok(users)
    }
}
