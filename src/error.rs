//! API error taxonomy and response body.
//!
//! Every failed request answers with the same JSON shape:
//! `{status, message, timestamp, errors[]}`. Authentication failures are
//! deliberately generic; the malformed-vs-expired distinction only reaches
//! the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Error payload returned on every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub timestamp: String,
    pub errors: Vec<String>,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            timestamp: Utc::now().to_rfc3339(),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(status: StatusCode, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            errors,
            ..Self::new(status, message)
        }
    }
}

/// API errors
#[derive(Debug)]
pub enum ApiError {
    /// No principal where one is required, or an unusable bearer token
    Unauthorized,
    /// Login failed; message matches the registration/login flow
    InvalidCredentials,
    /// Ownership/role denial
    Forbidden,
    /// Throttled; carries a Retry-After hint
    RateLimited,
    NotFound(String),
    BadRequest(String),
    Validation(Vec<String>),
    Internal,
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Log the real cause; the client only ever sees a generic message
        error!("Internal error: {err:#}");
        ApiError::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => {
                let status = StatusCode::UNAUTHORIZED;
                (status, ErrorBody::new(status, "Authentication failed"))
            }
            ApiError::InvalidCredentials => {
                let status = StatusCode::UNAUTHORIZED;
                (status, ErrorBody::new(status, "Invalid email or password"))
            }
            ApiError::Forbidden => {
                let status = StatusCode::FORBIDDEN;
                (
                    status,
                    ErrorBody::new(status, "You do not have permission to modify this resource"),
                )
            }
            ApiError::RateLimited => {
                let status = StatusCode::TOO_MANY_REQUESTS;
                let body = ErrorBody::new(status, "Too many requests. Please try again later.");
                return (status, [("Retry-After", "60")], Json(body)).into_response();
            }
            ApiError::NotFound(message) => {
                let status = StatusCode::NOT_FOUND;
                (status, ErrorBody::new(status, message))
            }
            ApiError::BadRequest(message) => {
                let status = StatusCode::BAD_REQUEST;
                (status, ErrorBody::new(status, message))
            }
            ApiError::Validation(errors) => {
                let status = StatusCode::BAD_REQUEST;
                (
                    status,
                    ErrorBody::with_errors(status, "Validation failed", errors),
                )
            }
            ApiError::Internal => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (status, ErrorBody::new(status, "Internal server error"))
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::RateLimited.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::NotFound("missing".to_string())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rate_limited_carries_retry_after() {
        let response = ApiError::RateLimited.into_response();
        assert_eq!(response.headers().get("Retry-After").unwrap(), "60");
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody::with_errors(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            vec!["email: must not be blank".to_string()],
        );

        let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&body).unwrap()).unwrap();
        assert_eq!(json["status"], 400);
        assert_eq!(json["message"], "Validation failed");
        assert!(json["timestamp"].is_string());
        assert_eq!(json["errors"].as_array().unwrap().len(), 1);
    }
}
