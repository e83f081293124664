//! # Infrastructure Layer
//!
//! MySQL implementations of the MoveMates repository traits, plus
//! connection-pool management. Nothing in this crate contains business
//! rules; it satisfies the contracts defined in `mm_core::repositories`.

use thiserror::Error;

/// Database module - MySQL implementations using SQLx
pub mod database;

pub use database::connection::DatabasePool;
pub use database::mysql::{
    MySqlDriverRepository, MySqlRefreshTokenRepository, MySqlRideRepository,
    MySqlTokenBlacklistRepository, MySqlUserRepository,
};

/// Infrastructure-level errors raised before a repository contract is in
/// play (pool construction, configuration)
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
