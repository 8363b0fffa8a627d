//! Marketplace API server.
//!
//! Wires configuration, stores, the token codec, the rate limiter and the
//! router together, then serves.

use anyhow::{Context, Result};
use dotenv::dotenv;
use marketplace_backend::{
    app::{create_router, AppState},
    auth::JwtHandler,
    config::{Config, DEFAULT_JWT_SECRET},
    middleware::{RateLimitConfig, RateLimiter},
    store::{ProductStore, UserStore},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let config = Config::from_env();

    if config.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("JWT_SECRET not set; using the default signing secret. Set it in production!");
    }

    let users = Arc::new(UserStore::new(&config.database_path)?);
    let products = Arc::new(ProductStore::new(&config.database_path)?);
    let jwt = Arc::new(JwtHandler::new(
        config.jwt_secret.clone(),
        config.jwt_lifetime_secs,
    ));

    let limiter = RateLimiter::new(RateLimitConfig {
        capacity: config.rate_limit_capacity,
        refill_period: config.rate_limit_refill,
    });

    let state = AppState {
        users,
        products,
        jwt,
    };
    let app = create_router(state, limiter, &config);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("API server listening on {}", config.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

/// Initialize tracing with env-filter support
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketplace_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
