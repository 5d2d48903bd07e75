//! Disruption endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use campusflow_common::AppResult;
use campusflow_core::{CreateDisruptionInput, DisruptionDetail, ResolveDisruptionInput};
use campusflow_db::entities::disruption;
use serde::Serialize;

use crate::{
    endpoints::tone::ToneAnalysisResponse,
    extractors::AuthActor,
    middleware::AppState,
};

/// Create disruption response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDisruptionResponse {
    pub message: String,
    pub disruption_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_tone_analysis: Option<ToneAnalysisResponse>,
}

/// Full disruption record response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisruptionResponse {
    pub disruption_id: String,
    pub student_id: String,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub category: String,
    pub priority: String,
    pub description: String,
    pub status: String,
    pub image_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_tone_analysis: Option<ToneAnalysisResponse>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
}

impl From<DisruptionDetail> for DisruptionResponse {
    fn from(detail: DisruptionDetail) -> Self {
        let d = detail.disruption;
        let ai_tone_analysis = match (d.ai_tone, d.ai_confidence, d.ai_recommendation) {
            (Some(tone), Some(confidence), Some(recommendation)) => Some(ToneAnalysisResponse {
                tone,
                confidence,
                recommendation,
            }),
            _ => None,
        };
        Self {
            disruption_id: d.disruption_id,
            student_id: d.student_id,
            student_name: d.student_name,
            student_email: d.student_email,
            category: d.category,
            priority: d.priority.as_str().to_string(),
            description: d.description,
            status: d.status.as_str().to_string(),
            image_urls: detail.images.into_iter().map(|i| i.url).collect(),
            ai_tone_analysis,
            created_at: d.created_at.to_rfc3339(),
            updated_at: d.updated_at.map(|dt| dt.to_rfc3339()),
            resolved_at: d.resolved_at.map(|dt| dt.to_rfc3339()),
            resolved_by: d.resolved_by,
        }
    }
}

/// Row in a student's disruption listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDisruptionRow {
    pub disruption_id: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub created_at: String,
}

impl From<disruption::Model> for StudentDisruptionRow {
    fn from(d: disruption::Model) -> Self {
        Self {
            disruption_id: d.disruption_id,
            category: d.category,
            priority: d.priority.as_str().to_string(),
            status: d.status.as_str().to_string(),
            created_at: d.created_at.to_rfc3339(),
        }
    }
}

/// Row in an admin's category listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDisruptionRow {
    pub disruption_id: String,
    pub student_name: Option<String>,
    pub priority: String,
    pub status: String,
    pub created_at: String,
}

impl From<disruption::Model> for CategoryDisruptionRow {
    fn from(d: disruption::Model) -> Self {
        Self {
            disruption_id: d.disruption_id,
            student_name: d.student_name,
            priority: d.priority.as_str().to_string(),
            status: d.status.as_str().to_string(),
            created_at: d.created_at.to_rfc3339(),
        }
    }
}

/// Resolve response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveDisruptionResponse {
    pub message: String,
    pub disruption_id: String,
    pub status: String,
    pub resolved_at: Option<String>,
    pub resolved_by: Option<String>,
}

/// File a new disruption.
async fn create(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Json(input): Json<CreateDisruptionInput>,
) -> AppResult<(StatusCode, Json<CreateDisruptionResponse>)> {
    let created = state.disruption_service.create(&actor.claims, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateDisruptionResponse {
            message: "Disruption created successfully".to_string(),
            disruption_id: created.disruption.disruption_id,
            ai_tone_analysis: created.annotation.map(Into::into),
        }),
    ))
}

/// Fetch a disruption by business id. Publicly readable.
async fn get_by_id(
    State(state): State<AppState>,
    Path(disruption_id): Path<String>,
) -> AppResult<Json<DisruptionResponse>> {
    let detail = state
        .disruption_service
        .get_by_business_id(&disruption_id)
        .await?;
    Ok(Json(detail.into()))
}

/// List a student's disruptions. Requester must be the student or an admin.
async fn list_by_student(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(student_ref): Path<String>,
) -> AppResult<Json<Vec<StudentDisruptionRow>>> {
    let rows = state
        .disruption_service
        .list_by_student(&actor, &student_ref)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// List disruptions in a category. Admin only.
async fn list_by_category(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<Vec<CategoryDisruptionRow>>> {
    let rows = state
        .disruption_service
        .list_by_category(&actor, &category)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Resolve a disruption. Admin only.
async fn resolve(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(disruption_id): Path<String>,
    Json(input): Json<ResolveDisruptionInput>,
) -> AppResult<Json<ResolveDisruptionResponse>> {
    let resolved = state
        .disruption_service
        .resolve(&actor, &disruption_id, input)
        .await?;

    Ok(Json(ResolveDisruptionResponse {
        message: "Resolved".to_string(),
        disruption_id: resolved.disruption_id,
        status: resolved.status.as_str().to_string(),
        resolved_at: resolved.resolved_at.map(|dt| dt.to_rfc3339()),
        resolved_by: resolved.resolved_by,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{disruption_id}", get(get_by_id))
        .route("/student/{student_ref}", get(list_by_student))
        .route("/admin/{category}", get(list_by_category))
        .route("/{disruption_id}/resolve", patch(resolve))
}
