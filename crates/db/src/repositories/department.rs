//! Department repository.

use std::sync::Arc;

use crate::entities::{Department, department};
use campusflow_common::{AppError, AppResult};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

/// Department repository for database operations.
#[derive(Clone)]
pub struct DepartmentRepository {
    db: Arc<DatabaseConnection>,
}

impl DepartmentRepository {
    /// Create a new department repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a department by its id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<department::Model>> {
        Department::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether a category names a seeded department.
    pub async fn exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// List all departments.
    pub async fn list(&self) -> AppResult<Vec<department::Model>> {
        Department::find()
            .order_by_asc(department::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_exists_for_seeded_department() {
        let dept = department::Model {
            id: "it".to_string(),
            name: "IT Department".to_string(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[dept]])
                .into_connection(),
        );

        let repo = DepartmentRepository::new(db);
        assert!(repo.exists("it").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_for_unknown_category() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<department::Model>::new()])
                .into_connection(),
        );

        let repo = DepartmentRepository::new(db);
        assert!(!repo.exists("cafeteria").await.unwrap());
    }
}
