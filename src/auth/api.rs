//! Authentication API Endpoints
//! Mission: Registration, login and current-user lookup

use crate::app::AppState;
use crate::auth::models::{
    AuthResponse, LoginRequest, Principal, RegisterRequest, Role, UserResponse,
};
use crate::error::ApiError;
use axum::{extract::State, Json};
use tracing::{info, warn};

/// Register endpoint - POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push("name: must not be blank".to_string());
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        errors.push("email: must be a valid email address".to_string());
    }
    if payload.password.len() < 6 {
        errors.push("password: must be at least 6 characters".to_string());
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    if state.users.exists_by_email(&payload.email)? {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let role = payload.role.unwrap_or(Role::User);
    let user = state
        .users
        .create_user(&payload.name, &payload.email, &payload.password, role)?;

    let principal = Principal::from_user(&user);
    let (token, expires_in) = state.jwt.issue(&principal)?;

    info!("Registered user: {} ({})", user.email, user.role.as_str());

    Ok(Json(AuthResponse {
        token,
        expires_in,
        user: UserResponse::from_user(&user),
    }))
}

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let valid = state
        .users
        .verify_password(&payload.email, &payload.password)?;

    if !valid {
        warn!("Failed login attempt: {}", payload.email);
        return Err(ApiError::InvalidCredentials);
    }

    let user = state
        .users
        .find_by_email(&payload.email)?
        .ok_or(ApiError::InvalidCredentials)?;

    let principal = Principal::from_user(&user);
    let (token, expires_in) = state.jwt.issue(&principal)?;

    info!("Login successful: {} ({})", user.email, user.role.as_str());

    Ok(Json(AuthResponse {
        token,
        expires_in,
        user: UserResponse::from_user(&user),
    }))
}

/// Current principal - GET /api/auth/me
///
/// Built from the validated token claims; no store lookup.
pub async fn me(principal: Principal) -> Json<Principal> {
    Json(principal)
}
