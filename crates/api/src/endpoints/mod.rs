//! API endpoints.

mod admin;
mod disruptions;
mod meta;
mod tone;
mod uploads;

pub use meta::home;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/disruptions", disruptions::router())
        .nest("/admin", admin::router())
        .nest("/upload", uploads::router())
        .merge(tone::router())
}
