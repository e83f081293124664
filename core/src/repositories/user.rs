//! User repository trait defining the interface for user data persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::{User, UserRole};
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The saved user
    /// * `Err(DomainError)` - Save failed (e.g., duplicate email)
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by their login email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Change a user's role
    ///
    /// # Returns
    /// * `Ok(true)` - Role updated
    /// * `Ok(false)` - No user with that ID
    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<bool, DomainError>;

    /// List all users (administrative)
    async fn list(&self) -> Result<Vec<User>, DomainError>;
}
