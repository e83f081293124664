//! Periodic maintenance of refresh tokens and the blacklist.
//!
//! Expired rows are already functionally inert; this task only reclaims
//! storage. It may run concurrently with live traffic - its deletes are
//! idempotent no-ops against rows already gone.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::{RefreshTokenRepository, TokenBlacklistRepository};

/// Configuration for the token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // run every hour
            enabled: true,
        }
    }
}

/// Service sweeping expired refresh tokens and blacklist entries
pub struct TokenCleanupService<R, B>
where
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
{
    refresh_tokens: Arc<R>,
    blacklist: Arc<B>,
    config: TokenCleanupConfig,
}

impl<R, B> TokenCleanupService<R, B>
where
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
{
    /// Create a new token cleanup service
    pub fn new(refresh_tokens: Arc<R>, blacklist: Arc<B>, config: TokenCleanupConfig) -> Self {
        Self {
            refresh_tokens,
            blacklist,
            config,
        }
    }

    /// Run a single cleanup cycle over both stores
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let now = Utc::now();
        let mut result = CleanupResult::default();

        match self.refresh_tokens.delete_expired(now).await {
            Ok(count) => {
                result.refresh_tokens_deleted = count;
                info!("Deleted {} expired refresh tokens", count);
            }
            Err(e) => {
                error!("Failed to sweep refresh tokens: {}", e);
                result.errors.push(format!("refresh token sweep: {}", e));
            }
        }

        match self.blacklist.delete_expired(now).await {
            Ok(count) => {
                result.blacklist_entries_deleted = count;
                info!("Deleted {} expired blacklist entries", count);
            }
            Err(e) => {
                error!("Failed to sweep blacklist: {}", e);
                result.errors.push(format!("blacklist sweep: {}", e));
            }
        }

        Ok(result)
    }

    /// Start the cleanup service as a background task.
    ///
    /// Spawns a tokio task that runs cleanup at the configured interval.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.errors.is_empty() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Token cleanup cycle failed: {}", e);
                    }
                }
            }
        });
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired refresh tokens deleted
    pub refresh_tokens_deleted: usize,
    /// Number of expired blacklist entries deleted
    pub blacklist_entries_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get total number of rows cleaned up
    pub fn total_cleaned(&self) -> usize {
        self.refresh_tokens_deleted + self.blacklist_entries_deleted
    }
}
