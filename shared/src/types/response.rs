//! API response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unified error response body for API errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl ToString, message: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_serialization() {
        let body = ErrorResponse::new("invalid_credentials", "Invalid email or password");
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("invalid_credentials"));
        assert!(json.contains("Invalid email or password"));
    }
}
