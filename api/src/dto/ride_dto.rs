use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use mm_core::domain::entities::ride::{Location, Ride};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocationDto {
    #[validate(length(min = 1, max = 512))]
    pub address: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

impl From<LocationDto> for Location {
    fn from(dto: LocationDto) -> Self {
        Location {
            address: dto.address,
            lat: dto.lat,
            lng: dto.lng,
        }
    }
}

impl From<Location> for LocationDto {
    fn from(location: Location) -> Self {
        LocationDto {
            address: location.address,
            lat: location.lat,
            lng: location.lng,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRideRequest {
    #[validate]
    pub pickup: LocationDto,
    #[validate]
    pub dropoff: LocationDto,
    /// One of "small", "medium", "large"
    pub cargo_size: String,
    #[validate(range(min = 0.1, max = 2000.0))]
    pub cargo_weight_kg: f64,
    #[validate(length(min = 1, max = 1024))]
    pub cargo_description: String,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRideStatusRequest {
    /// One of "accepted", "in_progress", "completed", "cancelled"
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideResponse {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub pickup: LocationDto,
    pub dropoff: LocationDto,
    pub status: String,
    pub estimated_distance_km: f64,
    pub estimated_price: f64,
    pub cargo_size: String,
    pub cargo_weight_kg: f64,
    pub cargo_description: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Ride> for RideResponse {
    fn from(ride: Ride) -> Self {
        Self {
            id: ride.id,
            rider_id: ride.rider_id,
            driver_id: ride.driver_id,
            pickup: ride.pickup.into(),
            dropoff: ride.dropoff.into(),
            status: ride.status.to_string(),
            estimated_distance_km: ride.estimated_distance_km,
            estimated_price: ride.estimated_price,
            cargo_size: ride.cargo_size.to_string(),
            cargo_weight_kg: ride.cargo_weight_kg,
            cargo_description: ride.cargo_description,
            scheduled_at: ride.scheduled_at,
            created_at: ride.created_at,
        }
    }
}
