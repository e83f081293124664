//! User account routes: signup, profile, administrative listing and
//! forced logout.

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth_dto::SignupRequest;
use crate::dto::user_dto::{ForceLogoutResponse, SignupResponse, UserResponse};
use crate::dto::ErrorResponse;
use crate::handlers::error::{handle_domain_error, handle_validation_errors};
use crate::middleware::auth::AuthContext;
use crate::routes::AppState;

use mm_core::repositories::{
    DriverRepository, RefreshTokenRepository, RideRepository, TokenBlacklistRepository,
    UserRepository,
};
use mm_core::services::auth::PasswordHasher;

/// Handler for POST /api/v1/users/signup (public)
pub async fn signup<U, D, K, R, B, P>(
    state: web::Data<AppState<U, D, K, R, B, P>>,
    request: web::Json<SignupRequest>,
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

    match state
        .auth_service
        .register(
            &request.email,
            &request.password,
            &request.name,
            request.phone.clone(),
        )
        .await
    {
        Ok(user) => HttpResponse::Created().json(SignupResponse {
            message: "Account created successfully.".to_string(),
            user: user.into(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/v1/users/me
pub async fn me<U, D, K, R, B, P>(
    state: web::Data<AppState<U, D, K, R, B, P>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    match state.users.find_by_id(auth.user_id).await {
        Ok(Some(user)) => HttpResponse::Ok().json(UserResponse::from(user)),
        Ok(None) => {
            HttpResponse::NotFound().json(ErrorResponse::new("not_found", "User not found"))
        }
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/v1/users (admin only)
pub async fn list_users<U, D, K, R, B, P>(
    state: web::Data<AppState<U, D, K, R, B, P>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    if let Err(error) = auth.require_admin() {
        return handle_domain_error(&error);
    }

    match state.users.list().await {
        Ok(users) => {
            let response: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for POST /api/v1/users/{id}/force-logout (admin only)
///
/// Deletes every refresh token for the target user. Access tokens
/// already in the wild keep working until their natural expiry.
pub async fn force_logout<U, D, K, R, B, P>(
    state: web::Data<AppState<U, D, K, R, B, P>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    if let Err(error) = auth.require_admin() {
        return handle_domain_error(&error);
    }

    let user_id = path.into_inner();

    match state.users.find_by_id(user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::NotFound()
                .json(ErrorResponse::new("not_found", "User not found"));
        }
        Err(error) => return handle_domain_error(&error),
    }

    match state.auth_service.force_logout(user_id).await {
        Ok(sessions_removed) => HttpResponse::Ok().json(ForceLogoutResponse {
            message: "User sessions invalidated".to_string(),
            sessions_removed,
        }),
        Err(error) => handle_domain_error(&error),
    }
}
