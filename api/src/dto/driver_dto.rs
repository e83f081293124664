use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use mm_core::domain::entities::driver::Driver;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterDriverRequest {
    /// One of "small", "medium", "large"
    pub vehicle_type: String,
    #[validate(length(min = 1, max = 32))]
    pub vehicle_plate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocationRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_type: String,
    pub vehicle_plate: String,
    pub is_available: bool,
    pub current_lat: Option<f64>,
    pub current_lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<Driver> for DriverResponse {
    fn from(driver: Driver) -> Self {
        Self {
            id: driver.id,
            user_id: driver.user_id,
            vehicle_type: driver.vehicle_type.to_string(),
            vehicle_plate: driver.vehicle_plate,
            is_available: driver.is_available,
            current_lat: driver.current_lat,
            current_lng: driver.current_lng,
            created_at: driver.created_at,
        }
    }
}
