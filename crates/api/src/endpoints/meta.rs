//! Service metadata endpoint.

use axum::Json;
use serde::Serialize;

/// Service banner response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    pub message: String,
    pub version: String,
}

/// Service banner, mounted at the root path.
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "CampusFlow API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
