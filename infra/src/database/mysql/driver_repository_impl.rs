//! MySQL implementation of the DriverRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use mm_core::domain::entities::driver::{Driver, VehicleType};
use mm_core::errors::DomainError;
use mm_core::repositories::DriverRepository;

/// MySQL implementation of DriverRepository
pub struct MySqlDriverRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlDriverRepository {
    /// Create a new MySQL driver repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Driver entity
    fn row_to_driver(row: &sqlx::mysql::MySqlRow) -> Result<Driver, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Storage {
            message: format!("Failed to get id: {}", e),
        })?;

        let user_id: String = row.try_get("user_id").map_err(|e| DomainError::Storage {
            message: format!("Failed to get user_id: {}", e),
        })?;

        let vehicle_type: String =
            row.try_get("vehicle_type").map_err(|e| DomainError::Storage {
                message: format!("Failed to get vehicle_type: {}", e),
            })?;

        Ok(Driver {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid driver UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            vehicle_type: vehicle_type
                .parse::<VehicleType>()
                .map_err(|e| DomainError::Internal {
                    message: format!("Invalid vehicle type: {}", e),
                })?,
            vehicle_plate: row
                .try_get("vehicle_plate")
                .map_err(|e| DomainError::Storage {
                    message: format!("Failed to get vehicle_plate: {}", e),
                })?,
            is_available: row
                .try_get("is_available")
                .map_err(|e| DomainError::Storage {
                    message: format!("Failed to get is_available: {}", e),
                })?,
            current_lat: row.try_get("current_lat").map_err(|e| DomainError::Storage {
                message: format!("Failed to get current_lat: {}", e),
            })?,
            current_lng: row.try_get("current_lng").map_err(|e| DomainError::Storage {
                message: format!("Failed to get current_lng: {}", e),
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

const DRIVER_COLUMNS: &str = "id, user_id, vehicle_type, vehicle_plate, is_available, \
                              current_lat, current_lng, created_at, updated_at";

#[async_trait]
impl DriverRepository for MySqlDriverRepository {
    async fn create(&self, driver: Driver) -> Result<Driver, DomainError> {
        let query = r#"
            INSERT INTO drivers (
                id, user_id, vehicle_type, vehicle_plate, is_available,
                current_lat, current_lng, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(driver.id.to_string())
            .bind(driver.user_id.to_string())
            .bind(driver.vehicle_type.to_string())
            .bind(&driver.vehicle_plate)
            .bind(driver.is_available)
            .bind(driver.current_lat)
            .bind(driver.current_lng)
            .bind(driver.created_at)
            .bind(driver.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to create driver: {}", e),
            })?;

        Ok(driver)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Driver>, DomainError> {
        let query = format!("SELECT {} FROM drivers WHERE id = ? LIMIT 1", DRIVER_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to find driver by id: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_driver(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Driver>, DomainError> {
        let query = format!(
            "SELECT {} FROM drivers WHERE user_id = ? LIMIT 1",
            DRIVER_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to find driver by user id: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_driver(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_available(&self) -> Result<Vec<Driver>, DomainError> {
        let query = format!(
            "SELECT {} FROM drivers WHERE is_available = TRUE ORDER BY updated_at DESC",
            DRIVER_COLUMNS
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to list available drivers: {}", e),
            })?;

        let mut drivers = Vec::new();
        for row in rows {
            drivers.push(Self::row_to_driver(&row)?);
        }

        Ok(drivers)
    }

    async fn set_availability(&self, user_id: Uuid, available: bool) -> Result<bool, DomainError> {
        let query = "UPDATE drivers SET is_available = ?, updated_at = ? WHERE user_id = ?";

        let result = sqlx::query(query)
            .bind(available)
            .bind(Utc::now())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to update driver availability: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_location(
        &self,
        user_id: Uuid,
        lat: f64,
        lng: f64,
    ) -> Result<bool, DomainError> {
        let query =
            "UPDATE drivers SET current_lat = ?, current_lng = ?, updated_at = ? WHERE user_id = ?";

        let result = sqlx::query(query)
            .bind(lat)
            .bind(lng)
            .bind(Utc::now())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Failed to update driver location: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }
}
