//! Ride routes: booking, listing, driver assignment, and status updates.

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::dto::ride_dto::{
    AssignDriverRequest, CreateRideRequest, RideResponse, UpdateRideStatusRequest,
};
use crate::dto::ErrorResponse;
use crate::handlers::error::{handle_domain_error, handle_validation_errors};
use crate::middleware::auth::AuthContext;
use crate::routes::AppState;

use mm_core::domain::entities::ride::{CargoSize, Location, Ride, RideStatus};
use mm_core::repositories::{
    DriverRepository, RefreshTokenRepository, RideRepository, TokenBlacklistRepository,
    UserRepository,
};
use mm_core::services::auth::PasswordHasher;

/// Handler for POST /api/v1/rides
///
/// Books a move. Distance and price are estimated server-side from the
/// pickup/dropoff coordinates and the cargo size.
pub async fn create_ride<U, D, K, R, B, P>(
    state: web::Data<AppState<U, D, K, R, B, P>>,
    auth: AuthContext,
    request: web::Json<CreateRideRequest>,
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

    let cargo_size = match request.cargo_size.parse::<CargoSize>() {
        Ok(cargo_size) => cargo_size,
        Err(_) => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "validation_error",
                "cargo_size must be one of: small, medium, large",
            ));
        }
    };

    let pickup: Location = request.pickup.clone().into();
    let dropoff: Location = request.dropoff.clone().into();

    let distance_km = haversine_km(&pickup, &dropoff);
    let price = estimate_price(distance_km, cargo_size);

    let ride = Ride::new(
        auth.user_id,
        pickup,
        dropoff,
        distance_km,
        price,
        cargo_size,
        request.cargo_weight_kg,
        request.cargo_description.clone(),
        request.scheduled_at,
    );

    match state.rides.create(ride).await {
        Ok(ride) => HttpResponse::Created().json(RideResponse::from(ride)),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/v1/rides - rides booked by the caller
pub async fn list_my_rides<U, D, K, R, B, P>(
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
    match state.rides.find_by_rider(auth.user_id).await {
        Ok(rides) => {
            let response: Vec<RideResponse> = rides.into_iter().map(RideResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/v1/rides/assigned - rides assigned to the
/// caller's driver profile
pub async fn list_assigned_rides<U, D, K, R, B, P>(
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
    let driver = match state.drivers.find_by_user_id(auth.user_id).await {
        Ok(Some(driver)) => driver,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse::new(
                "not_found",
                "No driver profile for this account",
            ));
        }
        Err(error) => return handle_domain_error(&error),
    };

    match state.rides.find_by_driver(driver.id).await {
        Ok(rides) => {
            let response: Vec<RideResponse> = rides.into_iter().map(RideResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/v1/rides/{id}
///
/// Visible to the booking rider, the assigned driver, and admins.
pub async fn get_ride<U, D, K, R, B, P>(
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
    let ride = match state.rides.find_by_id(path.into_inner()).await {
        Ok(Some(ride)) => ride,
        Ok(None) => {
            return HttpResponse::NotFound()
                .json(ErrorResponse::new("not_found", "Ride not found"));
        }
        Err(error) => return handle_domain_error(&error),
    };

    if !can_view_ride(&state, &auth, &ride).await {
        return HttpResponse::Forbidden()
            .json(ErrorResponse::new("forbidden", "Access forbidden"));
    }

    HttpResponse::Ok().json(RideResponse::from(ride))
}

/// Handler for POST /api/v1/rides/{id}/driver
///
/// The booking rider picks an available driver for a requested ride.
pub async fn assign_driver<U, D, K, R, B, P>(
    state: web::Data<AppState<U, D, K, R, B, P>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<AssignDriverRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    let mut ride = match state.rides.find_by_id(path.into_inner()).await {
        Ok(Some(ride)) => ride,
        Ok(None) => {
            return HttpResponse::NotFound()
                .json(ErrorResponse::new("not_found", "Ride not found"));
        }
        Err(error) => return handle_domain_error(&error),
    };

    if ride.rider_id != auth.user_id {
        return HttpResponse::Forbidden()
            .json(ErrorResponse::new("forbidden", "Access forbidden"));
    }

    let driver = match state.drivers.find_by_id(request.driver_id).await {
        Ok(Some(driver)) => driver,
        Ok(None) => {
            return HttpResponse::NotFound()
                .json(ErrorResponse::new("not_found", "Driver not found"));
        }
        Err(error) => return handle_domain_error(&error),
    };

    if !driver.is_available {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "driver_unavailable",
            "The selected driver is not available",
        ));
    }

    // Validates the Requested -> Accepted transition
    if let Err(error) = ride.assign_driver(driver.id) {
        return handle_domain_error(&error);
    }

    match state.rides.assign_driver(ride.id, driver.id).await {
        Ok(true) => HttpResponse::Ok().json(RideResponse::from(ride)),
        Ok(false) => {
            HttpResponse::NotFound().json(ErrorResponse::new("not_found", "Ride not found"))
        }
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for PATCH /api/v1/rides/{id}/status
///
/// The assigned driver (or an admin) advances the ride through its
/// lifecycle; transition rules are enforced by the entity.
pub async fn update_status<U, D, K, R, B, P>(
    state: web::Data<AppState<U, D, K, R, B, P>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateRideStatusRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    let status = match request.status.parse::<RideStatus>() {
        Ok(status) => status,
        Err(_) => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "validation_error",
                "Unknown ride status",
            ));
        }
    };

    let mut ride = match state.rides.find_by_id(path.into_inner()).await {
        Ok(Some(ride)) => ride,
        Ok(None) => {
            return HttpResponse::NotFound()
                .json(ErrorResponse::new("not_found", "Ride not found"));
        }
        Err(error) => return handle_domain_error(&error),
    };

    if !can_update_status(&state, &auth, &ride).await {
        return HttpResponse::Forbidden()
            .json(ErrorResponse::new("forbidden", "Access forbidden"));
    }

    if let Err(error) = ride.transition_to(status) {
        return handle_domain_error(&error);
    }

    match state.rides.update_status(ride.id, status).await {
        Ok(true) => HttpResponse::Ok().json(RideResponse::from(ride)),
        Ok(false) => {
            HttpResponse::NotFound().json(ErrorResponse::new("not_found", "Ride not found"))
        }
        Err(error) => handle_domain_error(&error),
    }
}

async fn can_view_ride<U, D, K, R, B, P>(
    state: &web::Data<AppState<U, D, K, R, B, P>>,
    auth: &AuthContext,
    ride: &Ride,
) -> bool
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    if auth.is_admin() || ride.rider_id == auth.user_id {
        return true;
    }
    is_assigned_driver(state, auth, ride).await
}

async fn can_update_status<U, D, K, R, B, P>(
    state: &web::Data<AppState<U, D, K, R, B, P>>,
    auth: &AuthContext,
    ride: &Ride,
) -> bool
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    if auth.is_admin() {
        return true;
    }
    is_assigned_driver(state, auth, ride).await
}

async fn is_assigned_driver<U, D, K, R, B, P>(
    state: &web::Data<AppState<U, D, K, R, B, P>>,
    auth: &AuthContext,
    ride: &Ride,
) -> bool
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    match state.drivers.find_by_user_id(auth.user_id).await {
        Ok(Some(driver)) => ride.driver_id == Some(driver.id),
        _ => false,
    }
}

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points
fn haversine_km(from: &Location, to: &Location) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Quote in rand: callout fee plus a per-kilometre rate, scaled by cargo
/// size
fn estimate_price(distance_km: f64, cargo_size: CargoSize) -> f64 {
    const CALLOUT_FEE: f64 = 150.0;
    const RATE_PER_KM: f64 = 18.5;

    let multiplier = match cargo_size {
        CargoSize::Small => 1.0,
        CargoSize::Medium => 1.35,
        CargoSize::Large => 1.8,
    };

    ((CALLOUT_FEE + RATE_PER_KM * distance_km) * multiplier * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> Location {
        Location {
            address: String::new(),
            lat,
            lng,
        }
    }

    #[test]
    fn test_haversine_zero_distance() {
        let p = point(-33.928, 18.411);
        assert!(haversine_km(&p, &p) < 1e-9);
    }

    #[test]
    fn test_haversine_cape_town_to_johannesburg() {
        // Roughly 1260 km apart
        let cape_town = point(-33.9249, 18.4241);
        let johannesburg = point(-26.2041, 28.0473);
        let distance = haversine_km(&cape_town, &johannesburg);
        assert!((1200.0..1320.0).contains(&distance), "got {}", distance);
    }

    #[test]
    fn test_price_scales_with_cargo_size() {
        let small = estimate_price(10.0, CargoSize::Small);
        let medium = estimate_price(10.0, CargoSize::Medium);
        let large = estimate_price(10.0, CargoSize::Large);
        assert!(small < medium && medium < large);
    }

    #[test]
    fn test_price_includes_callout_fee() {
        assert_eq!(estimate_price(0.0, CargoSize::Small), 150.0);
    }
}
