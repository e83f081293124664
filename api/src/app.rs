//! Route table and application configuration.

use actix_web::{web, HttpResponse};

use mm_core::repositories::{
    DriverRepository, RefreshTokenRepository, RideRepository, TokenBlacklistRepository,
    UserRepository,
};
use mm_core::services::auth::PasswordHasher;

use crate::middleware::auth::JwtAuth;
use crate::routes::{auth, drivers, rides, users};

/// Registers every route on the application.
///
/// Auth endpoints and signup are public; everything else sits behind the
/// JWT middleware, which runs the full access-token verification
/// (signature, expiry, and the revocation blacklist) per request.
pub fn configure_api<U, D, K, R, B, P>(cfg: &mut web::ServiceConfig)
where
    U: UserRepository + 'static,
    D: DriverRepository + 'static,
    K: RideRepository + 'static,
    R: RefreshTokenRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    P: PasswordHasher + 'static,
{
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api/v1")
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(auth::login::<U, D, K, R, B, P>))
                    .route("/refresh", web::post().to(auth::refresh::<U, D, K, R, B, P>))
                    .route("/logout", web::post().to(auth::logout::<U, D, K, R, B, P>)),
            )
            .route(
                "/users/signup",
                web::post().to(users::signup::<U, D, K, R, B, P>),
            )
            .service(
                web::scope("")
                    .wrap(JwtAuth::new())
                    .service(
                        web::scope("/users")
                            .route("/me", web::get().to(users::me::<U, D, K, R, B, P>))
                            .route("", web::get().to(users::list_users::<U, D, K, R, B, P>))
                            .route(
                                "/{id}/force-logout",
                                web::post().to(users::force_logout::<U, D, K, R, B, P>),
                            ),
                    )
                    .service(
                        web::scope("/drivers")
                            .route(
                                "",
                                web::post().to(drivers::register_driver::<U, D, K, R, B, P>),
                            )
                            .route(
                                "/available",
                                web::get().to(drivers::list_available::<U, D, K, R, B, P>),
                            )
                            .route(
                                "/availability",
                                web::patch().to(drivers::set_availability::<U, D, K, R, B, P>),
                            )
                            .route(
                                "/location",
                                web::patch().to(drivers::update_location::<U, D, K, R, B, P>),
                            ),
                    )
                    .service(
                        web::scope("/rides")
                            .route("", web::post().to(rides::create_ride::<U, D, K, R, B, P>))
                            .route("", web::get().to(rides::list_my_rides::<U, D, K, R, B, P>))
                            .route(
                                "/assigned",
                                web::get().to(rides::list_assigned_rides::<U, D, K, R, B, P>),
                            )
                            .route("/{id}", web::get().to(rides::get_ride::<U, D, K, R, B, P>))
                            .route(
                                "/{id}/driver",
                                web::post().to(rides::assign_driver::<U, D, K, R, B, P>),
                            )
                            .route(
                                "/{id}/status",
                                web::patch().to(rides::update_status::<U, D, K, R, B, P>),
                            ),
                    ),
            ),
    );
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "movemates-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
