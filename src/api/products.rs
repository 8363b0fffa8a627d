//! Product API Endpoints
//! Mission: Public catalogue reads, ownership-checked mutations

use crate::app::AppState;
use crate::auth::models::Principal;
use crate::auth::policy;
use crate::error::ApiError;
use crate::models::{CreateProductRequest, Product, ProductResponse, UpdateProductRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

/// List all products - GET /api/products (public)
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.products.list()?;
    Ok(Json(
        products.iter().map(ProductResponse::from_product).collect(),
    ))
}

/// Get a product by id - GET /api/products/:id (public)
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = load_product(&state, &id)?;
    Ok(Json(ProductResponse::from_product(&product)))
}

/// List one owner's products - GET /api/products/user/:user_id (public)
pub async fn list_products_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.products.find_by_user(&user_id)?;
    Ok(Json(
        products.iter().map(ProductResponse::from_product).collect(),
    ))
}

/// Create a product - POST /api/products (authenticated)
pub async fn create_product(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    validate_name_and_price(&payload.name, payload.price)?;

    let product = state.products.create(
        payload.name.trim(),
        payload.description.as_deref().unwrap_or(""),
        payload.price,
        &principal.id,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::from_product(&product)),
    ))
}

/// Update a product - PUT /api/products/:id (owner or admin)
pub async fn update_product(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let mut product = load_product(&state, &id)?;

    let decision = policy::decide(&principal, &product.user_id);
    if !decision.allowed {
        return Err(ApiError::Forbidden);
    }

    if let Some(name) = payload.name {
        product.name = name;
    }
    if let Some(description) = payload.description {
        product.description = description;
    }
    if let Some(price) = payload.price {
        product.price = price;
    }
    validate_name_and_price(&product.name, product.price)?;

    state.products.update(&product)?;

    info!(
        "Updated product {} ({:?} by {})",
        product.id, decision.reason, principal.id
    );

    Ok(Json(ProductResponse::from_product(&product)))
}

/// Delete a product - DELETE /api/products/:id (owner or admin)
pub async fn delete_product(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let product = load_product(&state, &id)?;

    let decision = policy::decide(&principal, &product.user_id);
    if !decision.allowed {
        return Err(ApiError::Forbidden);
    }

    state.products.delete(&product.id)?;

    info!(
        "Deleted product {} ({:?} by {})",
        product.id, decision.reason, principal.id
    );

    Ok(StatusCode::NO_CONTENT)
}

fn load_product(state: &AppState, id: &str) -> Result<Product, ApiError> {
    let uuid =
        Uuid::parse_str(id).map_err(|_| ApiError::BadRequest("Invalid product id".to_string()))?;

    state
        .products
        .find_by_id(&uuid)?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found with id: {id}")))
}

fn validate_name_and_price(name: &str, price: f64) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push("name: must not be blank".to_string());
    }
    if !price.is_finite() || price < 0.0 {
        errors.push("price: must be a non-negative number".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}
