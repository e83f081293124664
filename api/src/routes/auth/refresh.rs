use actix_web::{web, HttpRequest, HttpResponse};

use crate::dto::auth_dto::{AuthResponse, RefreshTokenRequest};
use crate::dto::ErrorResponse;
use crate::handlers::error::handle_domain_error;
use crate::routes::{extract_device_label, AppState};

use mm_core::repositories::{
    DriverRepository, RefreshTokenRepository, RideRepository, TokenBlacklistRepository,
    UserRepository,
};
use mm_core::services::auth::PasswordHasher;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a single-use refresh token for a new access/refresh pair.
/// The presented value is consumed whether or not the exchange succeeds;
/// unknown, already-used, and expired values all produce the same 401 so
/// a caller cannot probe which case it hit.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "opaque_value"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "new_opaque_value",
///     "expires_in": 900
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Invalid or expired refresh token
/// - 500 Internal Server Error: Storage failure
pub async fn refresh<U, D, K, R, B, P>(
    req: HttpRequest,
    state: web::Data<AppState<U, D, K, R, B, P>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    if request.refresh_token.trim().is_empty() {
        return HttpResponse::Unauthorized().json(ErrorResponse::new(
            "missing_refresh_token",
            "No refresh token provided",
        ));
    }

    let device_label = extract_device_label(&req);

    match state
        .token_service
        .refresh(&request.refresh_token, &device_label)
        .await
    {
        Ok(Some(pair)) => HttpResponse::Ok().json(AuthResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
        }),
        Ok(None) => HttpResponse::Unauthorized().json(ErrorResponse::new(
            "invalid_refresh_token",
            "Invalid or expired refresh token",
        )),
        Err(error) => handle_domain_error(&error),
    }
}
