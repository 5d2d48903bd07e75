//! Admin code redemption.
//!
//! Recognition codes promote a user to admin, scoped to the code's
//! department.

use campusflow_common::{AppError, AppResult};
use campusflow_db::{
    entities::user::{self, Role},
    repositories::{AdminCodeRepository, UserRepository},
};

use crate::services::identity::Actor;

/// Service for redeeming admin recognition codes.
#[derive(Clone)]
pub struct AdminCodeService {
    admin_code_repo: AdminCodeRepository,
    user_repo: UserRepository,
}

impl AdminCodeService {
    /// Create a new admin code service.
    #[must_use]
    pub const fn new(admin_code_repo: AdminCodeRepository, user_repo: UserRepository) -> Self {
        Self {
            admin_code_repo,
            user_repo,
        }
    }

    /// Redeem a recognition code for the acting user.
    ///
    /// Unknown or inactive codes are `NotFound`; expired codes are
    /// `Forbidden`. Redeeming as an existing admin is an idempotent no-op.
    pub async fn redeem(&self, actor: &Actor, code: &str) -> AppResult<user::Model> {
        let user = actor
            .user
            .clone()
            .ok_or_else(|| AppError::UserNotFound(actor.claims.sub.clone()))?;

        let code_row = self
            .admin_code_repo
            .find_active_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("admin code".to_string()))?;

        if let Some(expires_at) = code_row.expires_at
            && expires_at.with_timezone(&chrono::Utc) < chrono::Utc::now()
        {
            return Err(AppError::Forbidden("admin code expired".to_string()));
        }

        if user.role == Role::Admin {
            return Ok(user);
        }

        let promoted = self
            .user_repo
            .promote_to_admin(&user.id, &code_row.department_id)
            .await?;

        tracing::info!(
            user_id = %promoted.id,
            department = %code_row.department_id,
            "User promoted to admin"
        );

        Ok(promoted)
    }
}
