//! HTTP route handlers.

pub mod auth;
pub mod drivers;
pub mod rides;
pub mod users;

use std::sync::Arc;

use actix_web::{http::header, HttpRequest};

use mm_core::repositories::{
    DriverRepository, RefreshTokenRepository, RideRepository, TokenBlacklistRepository,
    UserRepository,
};
use mm_core::services::auth::{AuthService, PasswordHasher};
use mm_core::services::token::TokenService;

/// Application state that holds shared services and repositories
pub struct AppState<U, D, K, R, B, P>
where
    U: UserRepository,
    D: DriverRepository,
    K: RideRepository,
    R: RefreshTokenRepository,
    B: TokenBlacklistRepository,
    P: PasswordHasher,
{
    pub auth_service: Arc<AuthService<U, R, B, P>>,
    pub token_service: Arc<TokenService<R, B, U>>,
    pub users: Arc<U>,
    pub drivers: Arc<D>,
    pub rides: Arc<K>,
}

/// Device label for session tracking, taken from the User-Agent header.
/// Falls back to "unknown" when the header is absent.
pub(crate) fn extract_device_label(req: &HttpRequest) -> String {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|ua| ua.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
