//! Admin code repository.

use std::sync::Arc;

use crate::entities::{AdminCode, admin_code};
use campusflow_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Admin code repository for database operations.
#[derive(Clone)]
pub struct AdminCodeRepository {
    db: Arc<DatabaseConnection>,
}

impl AdminCodeRepository {
    /// Create a new admin code repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an active recognition code.
    pub async fn find_active_by_code(&self, code: &str) -> AppResult<Option<admin_code::Model>> {
        AdminCode::find()
            .filter(admin_code::Column::Code.eq(code))
            .filter(admin_code::Column::IsActive.eq(true))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_find_active_by_code() {
        let code = admin_code::Model {
            id: "c1".to_string(),
            department_id: "it".to_string(),
            code: "IT-SECRET".to_string(),
            created_at: Utc::now().into(),
            expires_at: None,
            is_active: true,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[code]])
                .into_connection(),
        );

        let repo = AdminCodeRepository::new(db);
        let result = repo.find_active_by_code("IT-SECRET").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().department_id, "it");
    }

    #[tokio::test]
    async fn test_find_active_by_code_none_for_unknown() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<admin_code::Model>::new()])
                .into_connection(),
        );

        let repo = AdminCodeRepository::new(db);
        let result = repo.find_active_by_code("WRONG").await.unwrap();

        assert!(result.is_none());
    }
}
