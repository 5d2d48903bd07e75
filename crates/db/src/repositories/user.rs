//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use campusflow_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};

use super::conflict_on_unique;

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by local ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by local ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by the identity provider's subject id.
    pub async fn find_by_auth_uid(&self, auth_uid: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::AuthUid.eq(auth_uid))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    ///
    /// A concurrent insert with the same `auth_uid` or email loses to the
    /// unique index and surfaces as `Conflict`.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| conflict_on_unique(e, "user"))
    }

    /// Link an identity provider subject id to an existing record.
    pub async fn link_auth_uid(&self, user: user::Model, auth_uid: &str) -> AppResult<user::Model> {
        let mut active: user::ActiveModel = user.into();
        active.auth_uid = Set(Some(auth_uid.to_string()));
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| conflict_on_unique(e, "auth_uid"))
    }

    /// Promote a user to admin, scoped to a department.
    pub async fn promote_to_admin(
        &self,
        user_id: &str,
        department_id: &str,
    ) -> AppResult<user::Model> {
        let user = self.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();
        active.role = Set(user::Role::Admin);
        active.admin_department = Set(Some(department_id.to_string()));
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Stamp `last_login` (single UPDATE query, no fetch).
    pub async fn touch_last_login(&self, user_id: &str) -> AppResult<()> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        User::update_many()
            .col_expr(user::Column::LastLogin, Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
