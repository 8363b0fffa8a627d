//! Marketplace Backend Library
//!
//! Exposes the modules used by the server binary and the integration tests.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod store;
