use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 7, max = 32))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout carries the access token in the body so a client can revoke a
/// token it can no longer present as a valid credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub token: String,
    #[serde(default)]
    pub all_devices: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest {
            email: "rider@example.com".to_string(),
            password: "hunter2!".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = LoginRequest {
            email: "not-an-email".to_string(),
            password: "hunter2!".to_string(),
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_signup_request_rejects_short_password() {
        let request = SignupRequest {
            email: "rider@example.com".to_string(),
            password: "short".to_string(),
            name: "Rider".to_string(),
            phone: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_logout_request_defaults_to_single_device() {
        let request: LogoutRequest = serde_json::from_str(r#"{"token": "abc"}"#).unwrap();
        assert!(!request.all_devices);
    }
}
