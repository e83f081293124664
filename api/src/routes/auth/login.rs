use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};
use crate::routes::{extract_device_label, AppState};

use mm_core::repositories::{
    DriverRepository, RefreshTokenRepository, RideRepository, TokenBlacklistRepository,
    UserRepository,
};
use mm_core::services::auth::PasswordHasher;

/// Handler for POST /api/v1/auth/login
///
/// Exchanges email/password credentials for an access/refresh token pair
/// scoped to the calling device (User-Agent).
///
/// # Request Body
///
/// ```json
/// {
///     "email": "rider@example.com",
///     "password": "secret"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Login successful.",
///     "access_token": "eyJ...",
///     "refresh_token": "opaque_value",
///     "expires_in": 900
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed email or missing password
/// - 401 Unauthorized: Unknown email or wrong password (indistinct)
/// - 500 Internal Server Error: Storage failure
pub async fn login<U, D, K, R, B, P>(
    req: HttpRequest,
    state: web::Data<AppState<U, D, K, R, B, P>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    if let Err(errors) = request.0.validate() {
        return handle_validation_errors(&errors);
    }

    let device_label = extract_device_label(&req);

    match state
        .auth_service
        .login(&request.email, &request.password, &device_label)
        .await
    {
        Ok((_user, pair)) => HttpResponse::Ok().json(LoginResponse {
            message: "Login successful.".to_string(),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
        }),
        Err(error) => handle_domain_error(&error),
    }
}
