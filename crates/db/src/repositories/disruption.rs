//! Disruption repository.

use std::sync::Arc;

use crate::entities::{Disruption, DisruptionImage, disruption, disruption_image, resolution};
use campusflow_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::conflict_on_unique;

/// Disruption repository for database operations.
#[derive(Clone)]
pub struct DisruptionRepository {
    db: Arc<DatabaseConnection>,
}

impl DisruptionRepository {
    /// Create a new disruption repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a disruption by its business id. Soft-deleted rows are invisible.
    pub async fn find_by_business_id(
        &self,
        disruption_id: &str,
    ) -> AppResult<Option<disruption::Model>> {
        Disruption::find()
            .filter(disruption::Column::DisruptionId.eq(disruption_id))
            .filter(disruption::Column::IsDeleted.eq(false))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a disruption by its business id, returning an error if not found.
    pub async fn get_by_business_id(&self, disruption_id: &str) -> AppResult<disruption::Model> {
        self.find_by_business_id(disruption_id)
            .await?
            .ok_or_else(|| AppError::DisruptionNotFound(disruption_id.to_string()))
    }

    /// Create a new disruption.
    ///
    /// The business id carries a unique index; a concurrent duplicate create
    /// loses the race and surfaces as `Conflict`.
    pub async fn create(&self, model: disruption::ActiveModel) -> AppResult<disruption::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| conflict_on_unique(e, "disruption"))
    }

    /// List a student's disruptions, newest first.
    pub async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<disruption::Model>> {
        Disruption::find()
            .filter(disruption::Column::StudentId.eq(student_id))
            .filter(disruption::Column::IsDeleted.eq(false))
            .order_by_desc(disruption::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all disruptions in a category, newest first.
    pub async fn list_by_category(&self, category: &str) -> AppResult<Vec<disruption::Model>> {
        Disruption::find()
            .filter(disruption::Column::Category.eq(category))
            .filter(disruption::Column::IsDeleted.eq(false))
            .order_by_desc(disruption::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store an advisory tone annotation on a disruption (single UPDATE).
    pub async fn set_tone_annotation(
        &self,
        id: &str,
        tone: &str,
        confidence: f64,
        recommendation: &str,
    ) -> AppResult<()> {
        let update = disruption::ActiveModel {
            ai_tone: Set(Some(tone.to_string())),
            ai_confidence: Set(Some(confidence)),
            ai_recommendation: Set(Some(recommendation.to_string())),
            ..Default::default()
        };
        Disruption::update_many()
            .set(update)
            .filter(disruption::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Attach an evidence image to a disruption.
    pub async fn add_image(
        &self,
        model: disruption_image::ActiveModel,
    ) -> AppResult<disruption_image::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List evidence images for a disruption, oldest first.
    pub async fn list_images(&self, id: &str) -> AppResult<Vec<disruption_image::Model>> {
        DisruptionImage::find()
            .filter(disruption_image::Column::DisruptionId.eq(id))
            .order_by_asc(disruption_image::Column::UploadedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Resolve a disruption: flip status, stamp `resolved_at`/`resolved_by`,
    /// and append the resolution record, all in one transaction.
    ///
    /// The status flip is a conditional update guarded on `status <> resolved`;
    /// zero rows affected means a concurrent resolver already won, and the
    /// loser gets `Conflict`. An already-resolved disruption is rejected the
    /// same way so resolution history is never silently discarded.
    pub async fn resolve(
        &self,
        disruption_id: &str,
        resolution_id: String,
        resolved_by: &str,
        resolution_description: &str,
        resolution_image_url: Option<&str>,
    ) -> AppResult<disruption::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let found = Disruption::find()
            .filter(disruption::Column::DisruptionId.eq(disruption_id))
            .filter(disruption::Column::IsDeleted.eq(false))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::DisruptionNotFound(disruption_id.to_string()))?;

        if found.status == disruption::Status::Resolved {
            return Err(AppError::Conflict(format!(
                "disruption {disruption_id} is already resolved"
            )));
        }

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

        let update = disruption::ActiveModel {
            status: Set(disruption::Status::Resolved),
            resolved_at: Set(Some(now)),
            resolved_by: Set(Some(resolved_by.to_string())),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        let updated = Disruption::update_many()
            .set(update)
            .filter(disruption::Column::Id.eq(found.id.clone()))
            .filter(disruption::Column::Status.ne(disruption::Status::Resolved))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if updated.rows_affected == 0 {
            // Lost the race; the transaction rolls back on drop.
            return Err(AppError::Conflict(format!(
                "disruption {disruption_id} is already resolved"
            )));
        }

        let record = resolution::ActiveModel {
            id: Set(resolution_id),
            disruption_id: Set(found.id.clone()),
            resolved_by: Set(resolved_by.to_string()),
            resolution_description: Set(resolution_description.to_string()),
            resolution_image_url: Set(resolution_image_url.map(ToString::to_string)),
            created_at: Set(now),
        };
        record
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(disruption::Model {
            status: disruption::Status::Resolved,
            resolved_at: Some(now),
            resolved_by: Some(resolved_by.to_string()),
            updated_at: Some(now),
            ..found
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::disruption::{Priority, Status};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_disruption(id: &str, business_id: &str, status: Status) -> disruption::Model {
        disruption::Model {
            id: id.to_string(),
            disruption_id: business_id.to_string(),
            student_id: "student1".to_string(),
            student_name: Some("Alice".to_string()),
            student_email: Some("alice@college.edu".to_string()),
            category: "it".to_string(),
            priority: Priority::Low,
            description: "printer broken".to_string(),
            status,
            ai_tone: None,
            ai_confidence: None,
            ai_recommendation: None,
            created_at: Utc::now().into(),
            updated_at: None,
            resolved_at: None,
            resolved_by: None,
            is_deleted: false,
        }
    }

    fn create_test_resolution(id: &str, disruption_pk: &str) -> resolution::Model {
        resolution::Model {
            id: id.to_string(),
            disruption_id: disruption_pk.to_string(),
            resolved_by: "admin1".to_string(),
            resolution_description: "replaced toner".to_string(),
            resolution_image_url: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_business_id_found() {
        let d = create_test_disruption("d1", "DIS-100", Status::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[d.clone()]])
                .into_connection(),
        );

        let repo = DisruptionRepository::new(db);
        let result = repo.find_by_business_id("DIS-100").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().disruption_id, "DIS-100");
    }

    #[tokio::test]
    async fn test_get_by_business_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<disruption::Model>::new()])
                .into_connection(),
        );

        let repo = DisruptionRepository::new(db);
        let result = repo.get_by_business_id("DIS-404").await;

        match result {
            Err(AppError::DisruptionNotFound(id)) => assert_eq!(id, "DIS-404"),
            _ => panic!("Expected DisruptionNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_create_disruption() {
        let d = create_test_disruption("d1", "DIS-100", Status::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[d.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = DisruptionRepository::new(db);

        let active = disruption::ActiveModel {
            id: Set("d1".to_string()),
            disruption_id: Set("DIS-100".to_string()),
            student_id: Set("student1".to_string()),
            category: Set("it".to_string()),
            priority: Set(Priority::Low),
            description: Set("printer broken".to_string()),
            status: Set(Status::Pending),
            ..Default::default()
        };

        let result = repo.create(active).await.unwrap();
        assert_eq!(result.disruption_id, "DIS-100");
        assert_eq!(result.status, Status::Pending);
    }

    #[tokio::test]
    async fn test_list_by_student() {
        let d1 = create_test_disruption("d1", "DIS-100", Status::Pending);
        let d2 = create_test_disruption("d2", "DIS-101", Status::Resolved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[d2.clone(), d1.clone()]])
                .into_connection(),
        );

        let repo = DisruptionRepository::new(db);
        let result = repo.list_by_student("student1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].disruption_id, "DIS-101");
    }

    #[tokio::test]
    async fn test_resolve_flips_status_and_appends_record() {
        let pending = create_test_disruption("d1", "DIS-100", Status::Pending);
        let record = create_test_resolution("r1", "d1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending]])
                .append_query_results([[record]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = DisruptionRepository::new(db);
        let resolved = repo
            .resolve("DIS-100", "r1".to_string(), "admin1", "replaced toner", None)
            .await
            .unwrap();

        assert_eq!(resolved.status, Status::Resolved);
        assert_eq!(resolved.resolved_by, Some("admin1".to_string()));
        assert!(resolved.resolved_at.is_some());
    }

    #[tokio::test]
    async fn test_resolve_unknown_business_id_returns_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<disruption::Model>::new()])
                .into_connection(),
        );

        let repo = DisruptionRepository::new(db);
        let result = repo
            .resolve("DIS-404", "r1".to_string(), "admin1", "done", None)
            .await;

        match result {
            Err(AppError::DisruptionNotFound(id)) => assert_eq!(id, "DIS-404"),
            _ => panic!("Expected DisruptionNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_resolve_already_resolved_returns_conflict() {
        let resolved = create_test_disruption("d1", "DIS-100", Status::Resolved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[resolved]])
                .into_connection(),
        );

        let repo = DisruptionRepository::new(db);
        let result = repo
            .resolve("DIS-100", "r1".to_string(), "admin1", "again", None)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_resolve_lost_race_returns_conflict() {
        let pending = create_test_disruption("d1", "DIS-100", Status::Pending);

        // Conditional update affects zero rows: a concurrent resolver won.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = DisruptionRepository::new(db);
        let result = repo
            .resolve("DIS-100", "r1".to_string(), "admin1", "done", None)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
