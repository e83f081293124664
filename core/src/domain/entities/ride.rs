//! Ride entity: a furniture-moving booking with its lifecycle state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// Lifecycle state of a ride
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Requested,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    /// Whether this state permits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }

    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// Transitions are forward-only; `Cancelled` is reachable from any
    /// non-terminal state.
    pub fn can_transition_to(&self, next: RideStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            RideStatus::Requested => false,
            RideStatus::Accepted => *self == RideStatus::Requested,
            RideStatus::InProgress => *self == RideStatus::Accepted,
            RideStatus::Completed => *self == RideStatus::InProgress,
            RideStatus::Cancelled => true,
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RideStatus::Requested => "requested",
            RideStatus::Accepted => "accepted",
            RideStatus::InProgress => "in_progress",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

impl FromStr for RideStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested" => Ok(RideStatus::Requested),
            "accepted" => Ok(RideStatus::Accepted),
            "in_progress" => Ok(RideStatus::InProgress),
            "completed" => Ok(RideStatus::Completed),
            "cancelled" => Ok(RideStatus::Cancelled),
            other => Err(format!("unknown ride status: {}", other)),
        }
    }
}

/// Cargo size class for a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CargoSize {
    Small,
    Medium,
    Large,
}

impl fmt::Display for CargoSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CargoSize::Small => "small",
            CargoSize::Medium => "medium",
            CargoSize::Large => "large",
        };
        f.write_str(s)
    }
}

impl FromStr for CargoSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(CargoSize::Small),
            "medium" => Ok(CargoSize::Medium),
            "large" => Ok(CargoSize::Large),
            other => Err(format!("unknown cargo size: {}", other)),
        }
    }
}

/// A geographic point with its display address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

/// Ride entity: one booked move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    /// Unique identifier for the ride
    pub id: Uuid,

    /// The user who booked the move
    pub rider_id: Uuid,

    /// The driver assigned to the move, if any
    pub driver_id: Option<Uuid>,

    /// Pickup point
    pub pickup: Location,

    /// Dropoff point
    pub dropoff: Location,

    /// Lifecycle state
    pub status: RideStatus,

    /// Estimated trip distance in kilometres
    pub estimated_distance_km: f64,

    /// Estimated price quoted at booking time
    pub estimated_price: f64,

    /// Cargo size class
    pub cargo_size: CargoSize,

    /// Cargo weight in kilograms
    pub cargo_weight_kg: f64,

    /// Free-text cargo description
    pub cargo_description: String,

    /// Optional scheduled pickup time
    pub scheduled_at: Option<DateTime<Utc>>,

    /// Timestamp when the ride was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the ride was last updated
    pub updated_at: DateTime<Utc>,
}

impl Ride {
    /// Creates a new ride in the `Requested` state
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rider_id: Uuid,
        pickup: Location,
        dropoff: Location,
        estimated_distance_km: f64,
        estimated_price: f64,
        cargo_size: CargoSize,
        cargo_weight_kg: f64,
        cargo_description: String,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            rider_id,
            driver_id: None,
            pickup,
            dropoff,
            status: RideStatus::Requested,
            estimated_distance_km,
            estimated_price,
            cargo_size,
            cargo_weight_kg,
            cargo_description,
            scheduled_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Assigns a driver and moves the ride to `Accepted`.
    ///
    /// Only valid while the ride is still `Requested`.
    pub fn assign_driver(&mut self, driver_id: Uuid) -> DomainResult<()> {
        if self.status != RideStatus::Requested {
            return Err(DomainError::Validation {
                message: format!("cannot assign driver to a ride in state {}", self.status),
            });
        }
        self.driver_id = Some(driver_id);
        self.status = RideStatus::Accepted;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Moves the ride to `next`, enforcing the transition rules.
    pub fn transition_to(&mut self, next: RideStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::Validation {
                message: format!("invalid ride transition: {} -> {}", self.status, next),
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}
