//! Tone analysis endpoint.

use axum::{Json, Router, extract::State, routing::post};
use campusflow_common::AppResult;
use campusflow_core::ToneAnnotation;
use serde::{Deserialize, Serialize};

use crate::middleware::AppState;

/// Tone analysis response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneAnalysisResponse {
    pub tone: String,
    pub confidence: f64,
    pub recommendation: String,
}

impl From<ToneAnnotation> for ToneAnalysisResponse {
    fn from(annotation: ToneAnnotation) -> Self {
        Self {
            tone: annotation.tone,
            confidence: annotation.confidence,
            recommendation: annotation.recommendation,
        }
    }
}

/// Tone analysis request.
#[derive(Debug, Deserialize)]
pub struct AnalyzeToneRequest {
    #[serde(default)]
    pub description: String,
}

/// Analyze the tone of a description.
async fn analyze_tone(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeToneRequest>,
) -> AppResult<Json<ToneAnalysisResponse>> {
    let annotation = state.annotator.analyze(&req.description).await?;
    Ok(Json(annotation.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/analyze-tone", post(analyze_tone))
}
