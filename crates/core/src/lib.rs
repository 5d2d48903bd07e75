//! Core business logic for campusflow-rs.

pub mod services;

pub use services::*;
