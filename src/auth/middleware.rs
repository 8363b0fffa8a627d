//! Authentication Middleware
//! Mission: Bind a validated principal to the request context

use crate::auth::{jwt::JwtHandler, models::Principal};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;

/// Bind a principal from an `Authorization: Bearer` header, when present.
///
/// A missing header is not an error; the request proceeds unbound and
/// handlers that need a principal reject it themselves. A header that is
/// present but unusable short-circuits with a generic 401 before any
/// handler runs. The bound principal lives in this request's extensions
/// only, so it can never leak into another request.
pub async fn bind_principal(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get("Authorization")
        .map(|h| h.to_str().map(str::to_string));

    if let Some(header) = header {
        let value = header.map_err(|_| ApiError::Unauthorized)?;
        let token = value.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;

        let principal = jwt_handler.validate(token).map_err(|e| {
            // Malformed vs expired stays in the logs; the caller sees 401
            debug!("Bearer token rejected: {e}");
            ApiError::Unauthorized
        })?;

        req.extensions_mut().insert(principal);
    }

    Ok(next.run(req).await)
}

/// Extractor for handlers that require an authenticated principal.
///
/// Rejects with 401 when the request reached the handler unbound.
#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}
