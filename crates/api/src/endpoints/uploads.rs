//! Upload stub endpoints.
//!
//! Real file storage is out of scope; these synthesize a URL the way the
//! eventual storage integration would and leave the bytes behind.

use axum::{Json, Router, routing::post};
use campusflow_common::IdGenerator;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AdminActor, AuthActor},
    middleware::AppState,
};

/// Upload request metadata.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub filename: Option<String>,
    pub filesize: Option<String>,
}

/// Upload response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub url: String,
}

fn synthesize_url(kind: &str, req: &UploadRequest) -> String {
    let key = IdGenerator::new().generate();
    match req.filename.as_deref() {
        Some(filename) if !filename.is_empty() => {
            format!("https://storage.campusflow.example/{kind}/{key}-{filename}")
        }
        _ => format!("https://storage.campusflow.example/{kind}/{key}"),
    }
}

/// Upload a disruption evidence image (stub).
async fn upload_disruption_image(
    AuthActor(_actor): AuthActor,
    Json(req): Json<UploadRequest>,
) -> Json<UploadResponse> {
    Json(UploadResponse {
        message: "Image uploaded successfully".to_string(),
        url: synthesize_url("disruption", &req),
    })
}

/// Upload a resolution image (stub, admin only).
async fn upload_resolution_image(
    AdminActor(_actor): AdminActor,
    Json(req): Json<UploadRequest>,
) -> Json<UploadResponse> {
    Json(UploadResponse {
        message: "Resolution image uploaded successfully".to_string(),
        url: synthesize_url("resolution", &req),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/disruption-image", post(upload_disruption_image))
        .route("/resolution-image", post(upload_resolution_image))
}
