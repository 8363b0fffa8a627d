//! JWT Token Handler
//! Mission: Issue and validate signed session tokens

use crate::auth::models::{Claims, Principal};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::debug;

/// Why a token failed validation.
///
/// Internal only. Callers must surface a generic authentication failure
/// regardless of the variant so a caller cannot probe which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Undecodable payload or signature mismatch.
    Malformed,
    /// Structurally valid and correctly signed, but past its expiry.
    Expired,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "malformed token"),
            TokenError::Expired => write!(f, "expired token"),
        }
    }
}

impl std::error::Error for TokenError {}

/// JWT handler for token operations (HS256, process-wide secret)
pub struct JwtHandler {
    secret: String,
    lifetime_secs: i64,
}

impl JwtHandler {
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        Self {
            secret,
            lifetime_secs,
        }
    }

    /// Issue a token for a principal.
    ///
    /// Returns the encoded token plus seconds-until-expiry. Pure computation,
    /// no side effects.
    pub fn issue(&self, principal: &Principal) -> Result<(String, usize)> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::seconds(self.lifetime_secs))
            .context("Invalid expiry timestamp")?
            .timestamp();

        let claims = Claims {
            sub: principal.id.clone(),
            email: principal.email.clone(),
            role: principal.role,
            iat: now.timestamp() as usize,
            exp: expiration as usize,
        };

        debug!(
            "Issuing token for {} ({}), lifetime {}s",
            principal.email,
            principal.role.as_str(),
            self.lifetime_secs
        );

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")?;

        Ok((token, self.lifetime_secs.max(0) as usize))
    }

    /// Validate a token and reconstruct the embedded principal.
    ///
    /// Signature and expiry are both checked, with zero clock leeway so a
    /// token dies exactly at `exp`.
    pub fn validate(&self, token: &str) -> Result<Principal, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        })?;

        let claims = decoded.claims;
        debug!("Validated token for {}", claims.email);

        Ok(Principal {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}
