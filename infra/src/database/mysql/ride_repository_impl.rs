//! MySQL implementation of the RideRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use mm_core::domain::entities::ride::{CargoSize, Location, Ride, RideStatus};
use mm_core::errors::DomainError;
use mm_core::repositories::RideRepository;

/// MySQL implementation of RideRepository
pub struct MySqlRideRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRideRepository {
    /// Create a new MySQL ride repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Ride entity
    fn row_to_ride(row: &sqlx::mysql::MySqlRow) -> Result<Ride, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Storage {
            message: format!("Failed to get id: {}", e),
        })?;

        let rider_id: String = row.try_get("rider_id").map_err(|e| DomainError::Storage {
            message: format!("Failed to get rider_id: {}", e),
        })?;

        let driver_id: Option<String> =
            row.try_get("driver_id").map_err(|e| DomainError::Storage {
                message: format!("Failed to get driver_id: {}", e),
            })?;

        let status: String = row.try_get("status").map_err(|e| DomainError::Storage {
            message: format!("Failed to get status: {}", e),
        })?;

        let cargo_size: String = row.try_get("cargo_size").map_err(|e| DomainError::Storage {
            message: format!("Failed to get cargo_size: {}", e),
        })?;

        let get_f64 = |name: &str| -> Result<f64, DomainError> {
            row.try_get(name).map_err(|e| DomainError::Storage {
                message: format!("Failed to get {}: {}", name, e),
            })
        };

        let get_string = |name: &str| -> Result<String, DomainError> {
            row.try_get(name).map_err(|e| DomainError::Storage {
                message: format!("Failed to get {}: {}", name, e),
            })
        };

        Ok(Ride {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid ride UUID: {}", e),
            })?,
            rider_id: Uuid::parse_str(&rider_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid rider UUID: {}", e),
            })?,
            driver_id: driver_id
                .map(|d| {
                    Uuid::parse_str(&d).map_err(|e| DomainError::Internal {
                        message: format!("Invalid driver UUID: {}", e),
                    })
                })
                .transpose()?,
            pickup: Location {
                address: get_string("pickup_address")?,
                lat: get_f64("pickup_lat")?,
                lng: get_f64("pickup_lng")?,
            },
            dropoff: Location {
                address: get_string("dropoff_address")?,
                lat: get_f64("dropoff_lat")?,
                lng: get_f64("dropoff_lng")?,
            },
            status: status.parse::<RideStatus>().map_err(|e| DomainError::Internal {
                message: format!("Invalid ride status: {}", e),
            })?,
            estimated_distance_km: get_f64("estimated_distance_km")?,
            estimated_price: get_f64("estimated_price")?,
            cargo_size: cargo_size
                .parse::<CargoSize>()
                .map_err(|e| DomainError::Internal {
                    message: format!("Invalid cargo size: {}", e),
                })?,
            cargo_weight_kg: get_f64("cargo_weight_kg")?,
            cargo_description: get_string("cargo_description")?,
            scheduled_at: row
                .try_get::<Option<DateTime<Utc>>, _>("scheduled_at")
                .map_err(|e| DomainError::Storage {
                    message: format!("Failed to get scheduled_at: {}", e),
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

const RIDE_COLUMNS: &str = "id, rider_id, driver_id, pickup_address, pickup_lat, pickup_lng, \
                            dropoff_address, dropoff_lat, dropoff_lng, status, \
                            estimated_distance_km, estimated_price, cargo_size, cargo_weight_kg, \
                            cargo_description, scheduled_at, created_at, updated_at";

#[async_trait]
impl RideRepository for MySqlRideRepository {
    async fn create(&self, ride: Ride) -> Result<Ride, DomainError> {
        let query = r#"
            INSERT INTO rides (
                id, rider_id, driver_id, pickup_address, pickup_lat, pickup_lng,
                dropoff_address, dropoff_lat, dropoff_lng, status,
                estimated_distance_km, estimated_price, cargo_size, cargo_weight_kg,
                cargo_description, scheduled_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(ride.id.to_string())
            .bind(ride.rider_id.to_string())
            .bind(ride.driver_id.map(|d| d.to_string()))
            .bind(&ride.pickup.address)
            .bind(ride.pickup.lat)
            .bind(ride.pickup.lng)
            .bind(&ride.dropoff.address)
            .bind(ride.dropoff.lat)
            .bind(ride.dropoff.lng)
            .bind(ride.status.to_string())
            .bind(ride.estimated_distance_km)
            .bind(ride.estimated_price)
            .bind(ride.cargo_size.to_string())
            .bind(ride.cargo_weight_kg)
            .bind(&ride.cargo_description)
            .bind(ride.scheduled_at)
            .bind(ride.created_at)
            .bind(ride.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to create ride: {}", e),
            })?;

        Ok(ride)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ride>, DomainError> {
        let query = format!("SELECT {} FROM rides WHERE id = ? LIMIT 1", RIDE_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to find ride by id: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_ride(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_rider(&self, rider_id: Uuid) -> Result<Vec<Ride>, DomainError> {
        let query = format!(
            "SELECT {} FROM rides WHERE rider_id = ? ORDER BY created_at DESC",
            RIDE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(rider_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to list rider rides: {}", e),
            })?;

        let mut rides = Vec::new();
        for row in rows {
            rides.push(Self::row_to_ride(&row)?);
        }

        Ok(rides)
    }

    async fn find_by_driver(&self, driver_id: Uuid) -> Result<Vec<Ride>, DomainError> {
        let query = format!(
            "SELECT {} FROM rides WHERE driver_id = ? ORDER BY created_at DESC",
            RIDE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(driver_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to list driver rides: {}", e),
            })?;

        let mut rides = Vec::new();
        for row in rows {
            rides.push(Self::row_to_ride(&row)?);
        }

        Ok(rides)
    }

    async fn assign_driver(&self, ride_id: Uuid, driver_id: Uuid) -> Result<bool, DomainError> {
        let query = "UPDATE rides SET driver_id = ?, status = ?, updated_at = ? WHERE id = ?";

        let result = sqlx::query(query)
            .bind(driver_id.to_string())
            .bind(RideStatus::Accepted.to_string())
            .bind(Utc::now())
            .bind(ride_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to assign driver: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_status(&self, ride_id: Uuid, status: RideStatus) -> Result<bool, DomainError> {
        let query = "UPDATE rides SET status = ?, updated_at = ? WHERE id = ?";

        let result = sqlx::query(query)
            .bind(status.to_string())
            .bind(Utc::now())
            .bind(ride_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to update ride status: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }
}
