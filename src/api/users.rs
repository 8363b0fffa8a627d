//! User API Endpoints
//! Mission: User management, self-or-admin access

use crate::app::AppState;
use crate::auth::models::{Principal, Role, UpdateUserRequest, User, UserResponse};
use crate::auth::policy;
use crate::error::ApiError;
use crate::store::UserStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

/// List all users - GET /api/users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    if principal.role != Role::Admin {
        return Err(ApiError::Forbidden);
    }

    let users = state.users.list_users()?;
    Ok(Json(users.iter().map(UserResponse::from_user).collect()))
}

/// Get a user by id - GET /api/users/:id (self or admin)
pub async fn get_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = load_user(&state, &id)?;

    if !policy::decide(&principal, &id).allowed {
        return Err(ApiError::Forbidden);
    }

    Ok(Json(UserResponse::from_user(&user)))
}

/// Update a user - PUT /api/users/:id (self or admin)
pub async fn update_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut user = load_user(&state, &id)?;

    if !policy::decide(&principal, &id).allowed {
        return Err(ApiError::Forbidden);
    }

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation(vec![
                "name: must not be blank".to_string(),
            ]));
        }
        user.name = name;
    }
    if let Some(email) = payload.email {
        if !email.contains('@') {
            return Err(ApiError::Validation(vec![
                "email: must be a valid email address".to_string(),
            ]));
        }
        user.email = email;
    }
    if let Some(password) = payload.password {
        if password.len() < 6 {
            return Err(ApiError::Validation(vec![
                "password: must be at least 6 characters".to_string(),
            ]));
        }
        user.password_hash = UserStore::hash_password(&password)?;
    }

    state.users.update_user(&user)?;

    info!("Updated user {} (by {})", user.id, principal.id);

    Ok(Json(UserResponse::from_user(&user)))
}

/// Delete a user - DELETE /api/users/:id (self or admin)
pub async fn delete_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user = load_user(&state, &id)?;

    if !policy::decide(&principal, &id).allowed {
        return Err(ApiError::Forbidden);
    }

    state.users.delete_user(&user.id)?;

    info!("Deleted user {} (by {})", user.id, principal.id);

    Ok(StatusCode::NO_CONTENT)
}

fn load_user(state: &AppState, id: &str) -> Result<User, ApiError> {
    let uuid =
        Uuid::parse_str(id).map_err(|_| ApiError::BadRequest("Invalid user id".to_string()))?;

    state
        .users
        .find_by_id(&uuid)?
        .ok_or_else(|| ApiError::NotFound(format!("User not found with id: {id}")))
}
