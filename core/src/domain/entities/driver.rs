//! Driver entity: a user's vehicle profile and availability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Vehicle size class, matched against ride cargo size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Small,
    Medium,
    Large,
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VehicleType::Small => "small",
            VehicleType::Medium => "medium",
            VehicleType::Large => "large",
        };
        f.write_str(s)
    }
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(VehicleType::Small),
            "medium" => Ok(VehicleType::Medium),
            "large" => Ok(VehicleType::Large),
            other => Err(format!("unknown vehicle type: {}", other)),
        }
    }
}

/// Driver profile linked to a user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Unique identifier for the driver profile
    pub id: Uuid,

    /// Owning user account
    pub user_id: Uuid,

    /// Vehicle size class
    pub vehicle_type: VehicleType,

    /// Vehicle registration plate
    pub vehicle_plate: String,

    /// Whether the driver is currently accepting rides
    pub is_available: bool,

    /// Last reported latitude
    pub current_lat: Option<f64>,

    /// Last reported longitude
    pub current_lng: Option<f64>,

    /// Timestamp when the profile was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the profile was last updated
    pub updated_at: DateTime<Utc>,
}

impl Driver {
    /// Creates a new driver profile, initially unavailable
    pub fn new(user_id: Uuid, vehicle_type: VehicleType, vehicle_plate: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            vehicle_type,
            vehicle_plate,
            is_available: false,
            current_lat: None,
            current_lng: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Updates availability
    pub fn set_available(&mut self, available: bool) {
        self.is_available = available;
        self.updated_at = Utc::now();
    }

    /// Records the driver's current position
    pub fn update_location(&mut self, lat: f64, lng: f64) {
        self.current_lat = Some(lat);
        self.current_lng = Some(lng);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_driver_is_unavailable() {
        let driver = Driver::new(Uuid::new_v4(), VehicleType::Medium, "CA 123-456".to_string());
        assert!(!driver.is_available);
        assert!(driver.current_lat.is_none());
    }

    #[test]
    fn test_update_location() {
        let mut driver = Driver::new(Uuid::new_v4(), VehicleType::Large, "GP 789".to_string());
        driver.update_location(-33.92, 18.42);
        assert_eq!(driver.current_lat, Some(-33.92));
        assert_eq!(driver.current_lng, Some(18.42));
    }

    #[test]
    fn test_vehicle_type_round_trip() {
        for vt in [VehicleType::Small, VehicleType::Medium, VehicleType::Large] {
            let parsed: VehicleType = vt.to_string().parse().unwrap();
            assert_eq!(parsed, vt);
        }
    }
}
