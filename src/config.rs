//! Environment-backed configuration.

use std::env;
use std::time::Duration;

pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_path: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 24h)
    pub jwt_lifetime_secs: i64,
    /// Requests allowed per refill period on throttled endpoints
    pub rate_limit_capacity: u32,
    pub rate_limit_refill: Duration,
    /// Path prefixes the rate limiter applies to
    pub throttled_prefixes: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "marketplace.db".to_string());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());

        let jwt_lifetime_secs = env::var("JWT_EXPIRATION_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(86_400);

        let rate_limit_capacity = env::var("RATE_LIMIT_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5);

        let rate_limit_refill = env::var("RATE_LIMIT_REFILL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));

        let throttled_prefixes = env::var("RATE_LIMIT_PREFIXES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let throttled_prefixes = if throttled_prefixes.is_empty() {
            vec![
                "/api/auth/login".to_string(),
                "/api/auth/register".to_string(),
            ]
        } else {
            throttled_prefixes
        };

        Self {
            bind_addr,
            database_path,
            jwt_secret,
            jwt_lifetime_secs,
            rate_limit_capacity,
            rate_limit_refill,
            throttled_prefixes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only checks defaults that no env var in CI is likely to override
        let config = Config::from_env();
        assert!(config.throttled_prefixes.iter().any(|p| p.contains("login")));
        assert!(config
            .throttled_prefixes
            .iter()
            .any(|p| p.contains("register")));
    }
}
