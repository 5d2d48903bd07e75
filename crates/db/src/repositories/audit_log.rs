//! Audit log repository.

use std::sync::Arc;

use crate::entities::audit_log;
use campusflow_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Audit log repository for database operations.
#[derive(Clone)]
pub struct AuditLogRepository {
    db: Arc<DatabaseConnection>,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append an audit record.
    pub async fn record(
        &self,
        id: String,
        actor_id: Option<String>,
        action: String,
        target_table: Option<String>,
        target_id: Option<String>,
        meta: Option<String>,
    ) -> AppResult<audit_log::Model> {
        let model = audit_log::ActiveModel {
            id: Set(id),
            actor_id: Set(actor_id),
            action: Set(action),
            target_table: Set(target_table),
            target_id: Set(target_id),
            meta: Set(meta),
            created_at: Set(chrono::Utc::now().into()),
        };
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
