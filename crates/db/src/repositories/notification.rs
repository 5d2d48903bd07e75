//! Notification repository.

use std::sync::Arc;

use crate::entities::notification;
use campusflow_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create an in-app notification for a user.
    pub async fn create(
        &self,
        id: String,
        user_id: String,
        disruption_id: Option<String>,
        channel: String,
        payload: Option<String>,
    ) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            disruption_id: Set(disruption_id),
            channel: Set(channel),
            payload: Set(payload),
            sent_at: Set(None),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
