//! Admin endpoints.

use axum::{Json, Router, extract::State, routing::post};
use campusflow_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthActor, middleware::AppState};

/// Redeem code request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemCodeRequest {
    pub code: Option<String>,
}

/// Redeem code response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemCodeResponse {
    pub message: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_department: Option<String>,
}

/// Redeem an admin recognition code for the authenticated user.
async fn redeem_code(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Json(req): Json<RedeemCodeRequest>,
) -> AppResult<Json<RedeemCodeResponse>> {
    let code = req
        .code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::Validation("missing required field: code".to_string()))?;

    let user = state.admin_code_service.redeem(&actor, code).await?;

    Ok(Json(RedeemCodeResponse {
        message: "Admin access granted".to_string(),
        role: user.role.as_str().to_string(),
        admin_department: user.admin_department,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/redeem-code", post(redeem_code))
}
