//! Driver routes: vehicle registration, availability, and location.

use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::driver_dto::{
    AvailabilityRequest, DriverResponse, LocationRequest, RegisterDriverRequest,
};
use crate::dto::ErrorResponse;
use crate::handlers::error::{handle_domain_error, handle_validation_errors};
use crate::middleware::auth::AuthContext;
use crate::routes::AppState;

use mm_core::domain::entities::driver::{Driver, VehicleType};
use mm_core::domain::entities::user::UserRole;
use mm_core::repositories::{
    DriverRepository, RefreshTokenRepository, RideRepository, TokenBlacklistRepository,
    UserRepository,
};
use mm_core::services::auth::PasswordHasher;

/// Handler for POST /api/v1/drivers
///
/// Registers a vehicle for the authenticated user and promotes the
/// account to the driver role. The role change reaches the access token
/// at the next refresh.
pub async fn register_driver<U, D, K, R, B, P>(
    state: web::Data<AppState<U, D, K, R, B, P>>,
    auth: AuthContext,
    request: web::Json<RegisterDriverRequest>,
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

    let vehicle_type = match request.vehicle_type.parse::<VehicleType>() {
        Ok(vehicle_type) => vehicle_type,
        Err(_) => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "validation_error",
                "vehicle_type must be one of: small, medium, large",
            ));
        }
    };

    match state.drivers.find_by_user_id(auth.user_id).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(ErrorResponse::new(
                "driver_exists",
                "A driver profile already exists for this account",
            ));
        }
        Ok(None) => {}
        Err(error) => return handle_domain_error(&error),
    }

    let driver = Driver::new(auth.user_id, vehicle_type, request.vehicle_plate.clone());

    match state.drivers.create(driver).await {
        Ok(driver) => {
            if let Err(error) = state.users.update_role(auth.user_id, UserRole::Driver).await {
                return handle_domain_error(&error);
            }
            HttpResponse::Created().json(DriverResponse::from(driver))
        }
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/v1/drivers/available
pub async fn list_available<U, D, K, R, B, P>(
    state: web::Data<AppState<U, D, K, R, B, P>>,
    _auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    match state.drivers.list_available().await {
        Ok(drivers) => {
            let response: Vec<DriverResponse> =
                drivers.into_iter().map(DriverResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for PATCH /api/v1/drivers/availability
pub async fn set_availability<U, D, K, R, B, P>(
    state: web::Data<AppState<U, D, K, R, B, P>>,
    auth: AuthContext,
    request: web::Json<AvailabilityRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    match state
        .drivers
        .set_availability(auth.user_id, request.is_available)
        .await
    {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Availability updated",
            "is_available": request.is_available,
        })),
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse::new(
            "not_found",
            "No driver profile for this account",
        )),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for PATCH /api/v1/drivers/location
pub async fn update_location<U, D, K, R, B, P>(
    state: web::Data<AppState<U, D, K, R, B, P>>,
    auth: AuthContext,
    request: web::Json<LocationRequest>,
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
        .drivers
        .update_location(auth.user_id, request.lat, request.lng)
        .await
    {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Location updated",
        })),
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse::new(
            "not_found",
            "No driver profile for this account",
        )),
        Err(error) => handle_domain_error(&error),
    }
}
