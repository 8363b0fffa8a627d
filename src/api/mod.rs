//! Resource API handlers.

pub mod products;
pub mod users;
