//! Driver repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::driver::Driver;
use crate::errors::DomainError;

/// Repository trait for Driver profile persistence operations
#[async_trait]
pub trait DriverRepository: Send + Sync {
    /// Persist a new driver profile
    async fn create(&self, driver: Driver) -> Result<Driver, DomainError>;

    /// Find a driver profile by its identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Driver>, DomainError>;

    /// Find the driver profile belonging to a user account
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Driver>, DomainError>;

    /// List all drivers currently accepting rides
    async fn list_available(&self) -> Result<Vec<Driver>, DomainError>;

    /// Update a driver's availability flag
    ///
    /// # Returns
    /// * `Ok(true)` - Updated
    /// * `Ok(false)` - No profile for that user
    async fn set_availability(&self, user_id: Uuid, available: bool) -> Result<bool, DomainError>;

    /// Record a driver's current position
    async fn update_location(&self, user_id: Uuid, lat: f64, lng: f64)
        -> Result<bool, DomainError>;
}
