use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

use mm_api::app::configure_api;
use mm_api::middleware::auth::AccessTokenVerifier;
use mm_api::middleware::cors::create_cors;
use mm_api::routes::AppState;
use mm_core::services::auth::{AuthService, BcryptPasswordHasher};
use mm_core::services::token::{TokenCleanupConfig, TokenCleanupService, TokenService};
use mm_infra::{
    DatabasePool, MySqlDriverRepository, MySqlRefreshTokenRepository, MySqlRideRepository,
    MySqlTokenBlacklistRepository, MySqlUserRepository,
};
use mm_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting MoveMates API server");

    let config = AppConfig::from_env();
    if config.auth.jwt.is_using_default_secret() {
        tracing::warn!("JWT_SECRET is not set; using the development default");
    }

    // Database pool and repositories
    let db = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to create database connection pool")?;
    db.health_check()
        .await
        .context("Database is not reachable")?;
    let pool = db.pool();

    let users = Arc::new(MySqlUserRepository::new(pool.clone()));
    let drivers = Arc::new(MySqlDriverRepository::new(pool.clone()));
    let rides = Arc::new(MySqlRideRepository::new(pool.clone()));
    let refresh_tokens = Arc::new(MySqlRefreshTokenRepository::new(pool.clone()));
    let blacklist = Arc::new(MySqlTokenBlacklistRepository::new(pool));

    // Services
    let token_service = Arc::new(TokenService::new(
        refresh_tokens.clone(),
        blacklist.clone(),
        users.clone(),
        config.auth.clone(),
    ));
    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        token_service.clone(),
        Arc::new(BcryptPasswordHasher::default()),
    ));

    // Periodic sweep of expired refresh tokens and blacklist entries
    let cleanup = Arc::new(TokenCleanupService::new(
        refresh_tokens.clone(),
        blacklist.clone(),
        TokenCleanupConfig::default(),
    ));
    cleanup.start_background_task();

    let verifier: Arc<dyn AccessTokenVerifier> = token_service.clone();
    let verifier_data = web::Data::new(verifier);

    let app_state = web::Data::new(AppState {
        auth_service,
        token_service,
        users,
        drivers,
        rides,
    });

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(create_cors())
            .app_data(app_state.clone())
            .app_data(verifier_data.clone())
            .configure(configure_api::<
                MySqlUserRepository,
                MySqlDriverRepository,
                MySqlRideRepository,
                MySqlRefreshTokenRepository,
                MySqlTokenBlacklistRepository,
                BcryptPasswordHasher,
            >)
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind to {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
