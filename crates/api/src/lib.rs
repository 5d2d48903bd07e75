//! HTTP API layer for campusflow-rs.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: disruption lifecycle, tone analysis, admin codes, uploads
//! - **Extractors**: authentication and role enforcement
//! - **Middleware**: per-request identity verification and actor resolution
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;

pub use endpoints::{home, router};
pub use middleware::AppState;
