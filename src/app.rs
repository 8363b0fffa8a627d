//! Router assembly.
//!
//! Request flow, outermost first: CORS → request logging → rate limit gate
//! (throttled prefixes only) → bearer binding → handler. Mutating product
//! and user handlers run the ownership policy themselves after loading the
//! target resource.

use crate::api::{products, users};
use crate::auth::{api as auth_api, bind_principal, JwtHandler};
use crate::config::Config;
use crate::middleware::rate_limit::{rate_limit_middleware, RateLimitLayer, RateLimiter};
use crate::middleware::request_logging;
use crate::store::{ProductStore, UserStore};
use axum::{
    middleware,
    routing::get,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub products: Arc<ProductStore>,
    pub jwt: Arc<JwtHandler>,
}

/// Create the API router
pub fn create_router(state: AppState, limiter: RateLimiter, config: &Config) -> Router {
    let rate_limit_state = RateLimitLayer::new(limiter, config.throttled_prefixes.clone());

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(auth_api::register))
        .route("/api/auth/login", post(auth_api::login))
        .route("/api/auth/me", get(auth_api::me))
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/api/products/user/:user_id",
            get(products::list_products_by_user),
        )
        .route("/api/users", get(users::list_users))
        .route(
            "/api/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            bind_principal,
        ))
        .layer(middleware::from_fn_with_state(
            rate_limit_state,
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
