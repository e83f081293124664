use actix_web::{web, HttpRequest, HttpResponse};

use crate::dto::auth_dto::{LogoutRequest, LogoutResponse};
use crate::handlers::error::handle_domain_error;
use crate::routes::{extract_device_label, AppState};

use mm_core::repositories::{
    DriverRepository, RefreshTokenRepository, RideRepository, TokenBlacklistRepository,
    UserRepository,
};
use mm_core::services::auth::PasswordHasher;

/// Handler for POST /api/v1/auth/logout
///
/// Blacklists the presented access token and deletes the caller's
/// refresh tokens - for the calling device only, or for every device
/// when `all_devices` is set. The token travels in the body so that an
/// already-expired token can still be revoked.
///
/// # Request Body
///
/// ```json
/// {
///     "token": "eyJ...",
///     "all_devices": false
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Successfully logged out"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing access token
/// - 401 Unauthorized: Token identity cannot be read
/// - 500 Internal Server Error: Revocation could not be recorded
pub async fn logout<U, D, K, R, B, P>(
    req: HttpRequest,
    state: web::Data<AppState<U, D, K, R, B, P>>,
    request: web::Json<LogoutRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    let device_label = extract_device_label(&req);

    match state
        .auth_service
        .logout(&request.token, &device_label, request.all_devices)
        .await
    {
        Ok(()) => {
            let message = if request.all_devices {
                "Successfully logged out from all devices"
            } else {
                "Successfully logged out"
            };
            HttpResponse::Ok().json(LogoutResponse {
                message: message.to_string(),
            })
        }
        Err(error) => handle_domain_error(&error),
    }
}
