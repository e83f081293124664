//! Ride repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::ride::{Ride, RideStatus};
use crate::errors::DomainError;

/// Repository trait for Ride entity persistence operations
#[async_trait]
pub trait RideRepository: Send + Sync {
    /// Persist a new ride
    async fn create(&self, ride: Ride) -> Result<Ride, DomainError>;

    /// Find a ride by its identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ride>, DomainError>;

    /// List rides booked by a rider, newest first
    async fn find_by_rider(&self, rider_id: Uuid) -> Result<Vec<Ride>, DomainError>;

    /// List rides assigned to a driver, newest first
    async fn find_by_driver(&self, driver_id: Uuid) -> Result<Vec<Ride>, DomainError>;

    /// Assign a driver to a ride and mark it accepted
    ///
    /// # Returns
    /// * `Ok(true)` - Updated
    /// * `Ok(false)` - No ride with that ID
    async fn assign_driver(&self, ride_id: Uuid, driver_id: Uuid) -> Result<bool, DomainError>;

    /// Update a ride's lifecycle state
    async fn update_status(&self, ride_id: Uuid, status: RideStatus) -> Result<bool, DomainError>;
}
