//! Authentication Module
//! Mission: Session tokens, principal binding, and ownership policy

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod policy;

pub use jwt::JwtHandler;
pub use middleware::bind_principal;
pub use models::{Principal, Role};
