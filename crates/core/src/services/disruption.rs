//! Disruption lifecycle service.
//!
//! Enforces the state machine and authorization rules around disruption
//! reports: create, read, list, resolve.

use std::sync::Arc;
use std::time::Duration;

use campusflow_common::{AppError, AppResult, IdGenerator};
use campusflow_db::{
    entities::user::Role,
    entities::{disruption, disruption_image},
    repositories::{
        AuditLogRepository, DepartmentRepository, DisruptionRepository, NotificationRepository,
    },
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::services::directory::DirectoryService;
use crate::services::identity::{Actor, IdentityClaims};
use crate::services::tone::{ToneAnnotation, ToneAnnotator};

/// Disruption service for business logic.
#[derive(Clone)]
pub struct DisruptionService {
    disruption_repo: DisruptionRepository,
    department_repo: DepartmentRepository,
    audit_repo: AuditLogRepository,
    notification_repo: NotificationRepository,
    directory: DirectoryService,
    annotator: Arc<dyn ToneAnnotator>,
    annotation_timeout: Duration,
    id_gen: IdGenerator,
}

/// Input for filing a new disruption.
///
/// Fields arrive optional so absence maps to a validation error rather
/// than a deserialization rejection.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDisruptionInput {
    #[validate(length(max = 64))]
    pub disruption_id: Option<String>,

    #[validate(length(max = 256))]
    pub student_name: Option<String>,

    #[validate(length(max = 256))]
    pub student_email: Option<String>,

    pub category: Option<String>,

    pub priority: Option<String>,

    #[validate(length(max = 4000))]
    pub description: Option<String>,

    /// Evidence image URLs already uploaded by the caller.
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Input for resolving a disruption.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResolveDisruptionInput {
    #[validate(length(max = 4000))]
    pub resolution_description: Option<String>,

    pub resolution_image: Option<String>,
}

/// A freshly created disruption plus whatever annotation was obtained
/// before the response went out.
#[derive(Debug)]
pub struct CreatedDisruption {
    /// The stored record.
    pub disruption: disruption::Model,
    /// Advisory tone annotation, if the annotator answered in time.
    pub annotation: Option<ToneAnnotation>,
}

/// A disruption with its attached evidence images.
#[derive(Debug)]
pub struct DisruptionDetail {
    /// The stored record.
    pub disruption: disruption::Model,
    /// Evidence images, oldest first.
    pub images: Vec<disruption_image::Model>,
}

fn required<'a>(value: &'a Option<String>, field: &str) -> AppResult<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!(
            "missing required field: {field}"
        ))),
    }
}

impl DisruptionService {
    /// Create a new disruption service.
    #[must_use]
    pub const fn new(
        disruption_repo: DisruptionRepository,
        department_repo: DepartmentRepository,
        audit_repo: AuditLogRepository,
        notification_repo: NotificationRepository,
        directory: DirectoryService,
        annotator: Arc<dyn ToneAnnotator>,
        annotation_timeout: Duration,
    ) -> Self {
        Self {
            disruption_repo,
            department_repo,
            audit_repo,
            notification_repo,
            directory,
            annotator,
            annotation_timeout,
            id_gen: IdGenerator::new(),
        }
    }

    /// File a new disruption for the authenticated requester.
    ///
    /// The owning student is derived from the verified claims, never from a
    /// client-supplied student id. Tone annotation is advisory: any
    /// annotator failure or timeout is logged and the creation still
    /// succeeds.
    pub async fn create(
        &self,
        claims: &IdentityClaims,
        input: CreateDisruptionInput,
    ) -> AppResult<CreatedDisruption> {
        input.validate()?;

        let disruption_id = required(&input.disruption_id, "disruptionId")?;
        let student_name = required(&input.student_name, "studentName")?;
        let student_email = required(&input.student_email, "studentEmail")?;
        let category = required(&input.category, "category")?;
        let priority_raw = required(&input.priority, "priority")?;
        let description = required(&input.description, "description")?;

        let priority = disruption::Priority::parse(priority_raw)
            .ok_or_else(|| AppError::Validation(format!("unknown priority: {priority_raw}")))?;

        if !self.department_repo.exists(category).await? {
            return Err(AppError::Validation(format!("unknown category: {category}")));
        }

        // Deterministic duplicate check; the unique index backstops races.
        if self
            .disruption_repo
            .find_by_business_id(disruption_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "disruption {disruption_id} already exists"
            )));
        }

        let student = self
            .directory
            .resolve_or_create(
                &claims.sub,
                Some(student_email),
                Some(student_name),
                Role::Student,
            )
            .await?;

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

        let model = disruption::ActiveModel {
            id: Set(self.id_gen.generate()),
            disruption_id: Set(disruption_id.to_string()),
            student_id: Set(student.id.clone()),
            student_name: Set(Some(student_name.to_string())),
            student_email: Set(Some(student_email.to_string())),
            category: Set(category.to_string()),
            priority: Set(priority),
            description: Set(description.to_string()),
            status: Set(disruption::Status::Pending),
            ai_tone: Set(None),
            ai_confidence: Set(None),
            ai_recommendation: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
            resolved_at: Set(None),
            resolved_by: Set(None),
            is_deleted: Set(false),
        };

        let mut created = self.disruption_repo.create(model).await?;

        for url in &input.image_urls {
            let image = disruption_image::ActiveModel {
                id: Set(self.id_gen.generate()),
                disruption_id: Set(created.id.clone()),
                url: Set(url.clone()),
                filename: Set(None),
                filesize: Set(None),
                uploaded_at: Set(now),
            };
            self.disruption_repo.add_image(image).await?;
        }

        let annotation = self.annotate(&created).await;
        if let Some(ref annotation) = annotation {
            created.ai_tone = Some(annotation.tone.clone());
            created.ai_confidence = Some(annotation.confidence);
            created.ai_recommendation = Some(annotation.recommendation.clone());
        }

        self.audit(Some(student.id), "disruption.create", &created.disruption_id)
            .await;

        tracing::info!(
            disruption_id = %created.disruption_id,
            category = %created.category,
            "Disruption created"
        );

        Ok(CreatedDisruption {
            disruption: created,
            annotation,
        })
    }

    /// Fetch a disruption by its business id, with attached images.
    ///
    /// Publicly readable; no authorization check.
    pub async fn get_by_business_id(&self, disruption_id: &str) -> AppResult<DisruptionDetail> {
        let disruption = self.disruption_repo.get_by_business_id(disruption_id).await?;
        let images = self.disruption_repo.list_images(&disruption.id).await?;
        Ok(DisruptionDetail { disruption, images })
    }

    /// List a student's disruptions, newest first.
    ///
    /// The target reference is polymorphic (local id or provider subject
    /// id). The requester must be the target or hold the admin role.
    pub async fn list_by_student(
        &self,
        actor: &Actor,
        student_ref: &str,
    ) -> AppResult<Vec<disruption::Model>> {
        let target = self
            .directory
            .resolve_student_ref(student_ref)
            .await?
            .ok_or_else(|| AppError::UserNotFound(student_ref.to_string()))?;

        if actor.role != Role::Admin {
            let requester = actor
                .user
                .as_ref()
                .ok_or_else(|| AppError::UserNotFound(actor.claims.sub.clone()))?;
            if requester.id != target.id {
                return Err(AppError::Forbidden(
                    "students may only list their own disruptions".to_string(),
                ));
            }
        }

        self.disruption_repo.list_by_student(&target.id).await
    }

    /// List all disruptions in a category, newest first. Admin only.
    pub async fn list_by_category(
        &self,
        actor: &Actor,
        category: &str,
    ) -> AppResult<Vec<disruption::Model>> {
        if actor.role != Role::Admin {
            return Err(AppError::Forbidden("admin only".to_string()));
        }

        self.disruption_repo.list_by_category(category).await
    }

    /// Resolve a disruption. Admin only.
    ///
    /// The status flip and the resolution record commit together or not at
    /// all; a disruption that is already resolved rejects with `Conflict`.
    pub async fn resolve(
        &self,
        actor: &Actor,
        disruption_id: &str,
        input: ResolveDisruptionInput,
    ) -> AppResult<disruption::Model> {
        if actor.role != Role::Admin {
            return Err(AppError::Forbidden("admin only".to_string()));
        }

        input.validate()?;
        let description = required(&input.resolution_description, "resolutionDescription")?;

        let resolver = actor
            .user
            .as_ref()
            .ok_or_else(|| AppError::UserNotFound(actor.claims.sub.clone()))?;

        let resolved = self
            .disruption_repo
            .resolve(
                disruption_id,
                self.id_gen.generate(),
                &resolver.id,
                description,
                input.resolution_image.as_deref(),
            )
            .await?;

        self.notify_student(&resolved).await;
        self.audit(
            Some(resolver.id.clone()),
            "disruption.resolve",
            &resolved.disruption_id,
        )
        .await;

        tracing::info!(
            disruption_id = %resolved.disruption_id,
            resolved_by = %resolver.id,
            "Disruption resolved"
        );

        Ok(resolved)
    }

    /// Best-effort tone annotation with a bounded timeout; persists the
    /// result onto the row when it arrives in time.
    async fn annotate(&self, disruption: &disruption::Model) -> Option<ToneAnnotation> {
        let analyzed = tokio::time::timeout(
            self.annotation_timeout,
            self.annotator.analyze(&disruption.description),
        )
        .await;

        match analyzed {
            Ok(Ok(annotation)) => {
                if let Err(e) = self
                    .disruption_repo
                    .set_tone_annotation(
                        &disruption.id,
                        &annotation.tone,
                        annotation.confidence,
                        &annotation.recommendation,
                    )
                    .await
                {
                    tracing::warn!(
                        error = %e,
                        disruption_id = %disruption.disruption_id,
                        "Failed to store tone annotation"
                    );
                }
                Some(annotation)
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    disruption_id = %disruption.disruption_id,
                    "Tone annotation failed"
                );
                None
            }
            Err(_) => {
                tracing::warn!(
                    disruption_id = %disruption.disruption_id,
                    timeout = ?self.annotation_timeout,
                    "Tone annotation timed out"
                );
                None
            }
        }
    }

    async fn notify_student(&self, resolved: &disruption::Model) {
        let payload = serde_json::json!({
            "disruptionId": resolved.disruption_id,
            "status": "resolved",
        })
        .to_string();

        if let Err(e) = self
            .notification_repo
            .create(
                self.id_gen.generate(),
                resolved.student_id.clone(),
                Some(resolved.id.clone()),
                "in_app".to_string(),
                Some(payload),
            )
            .await
        {
            tracing::warn!(
                error = %e,
                disruption_id = %resolved.disruption_id,
                "Failed to create resolution notification"
            );
        }
    }

    async fn audit(&self, actor_id: Option<String>, action: &str, business_id: &str) {
        if let Err(e) = self
            .audit_repo
            .record(
                self.id_gen.generate(),
                actor_id,
                action.to_string(),
                Some("disruption".to_string()),
                Some(business_id.to_string()),
                None,
            )
            .await
        {
            tracing::warn!(error = %e, action, "Failed to write audit log");
        }
    }
}
