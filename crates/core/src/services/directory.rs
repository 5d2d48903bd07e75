//! User directory.
//!
//! Maps identity provider subjects onto local user records, creating them
//! lazily on first sight.

use campusflow_common::{AppResult, IdGenerator};
use campusflow_db::{
    entities::user::{self, Role},
    repositories::UserRepository,
};
use sea_orm::Set;

use crate::services::identity::{Actor, IdentityClaims};

/// Directory service for identity-to-user resolution.
#[derive(Clone)]
pub struct DirectoryService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl DirectoryService {
    /// Create a new directory service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Resolve an identity provider subject to a local user, creating the
    /// record on first sight.
    ///
    /// Lookup order: by subject id, then by email. A record found by email
    /// with no subject id yet gets the subject linked to it (idempotent
    /// upsert). A brand-new record synthesizes a placeholder email when the
    /// provider supplied none.
    pub async fn resolve_or_create(
        &self,
        auth_uid: &str,
        email: Option<&str>,
        name: Option<&str>,
        default_role: Role,
    ) -> AppResult<user::Model> {
        if let Some(user) = self.user_repo.find_by_auth_uid(auth_uid).await? {
            self.touch_last_login(&user.id).await;
            return Ok(user);
        }

        if let Some(email) = email {
            if let Some(user) = self.user_repo.find_by_email(email).await? {
                let linked = self.user_repo.link_auth_uid(user, auth_uid).await?;
                self.touch_last_login(&linked.id).await;
                return Ok(linked);
            }
        }

        let email = email.map_or_else(|| format!("{auth_uid}@example.invalid"), ToString::to_string);

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            auth_uid: Set(Some(auth_uid.to_string())),
            email: Set(email),
            role: Set(default_role),
            admin_department: Set(None),
            name: Set(name.map(ToString::to_string)),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
            last_login: Set(None),
        };

        let created = self.user_repo.create(model).await?;
        self.touch_last_login(&created.id).await;
        Ok(created)
    }

    /// Resolve verified claims into a request actor.
    ///
    /// Role precedence: an admin signal on the claims is trusted as-is;
    /// otherwise the linked record's role applies; absent both, the
    /// requester is a non-admin. Called once per request.
    pub async fn resolve_actor(&self, claims: &IdentityClaims) -> AppResult<Actor> {
        let user = self.user_repo.find_by_auth_uid(&claims.sub).await?;

        let role = if claims.is_admin() {
            Role::Admin
        } else {
            user.as_ref().map_or(Role::Student, |u| u.role)
        };

        Ok(Actor {
            claims: claims.clone(),
            user,
            role,
        })
    }

    /// Resolve a polymorphic student reference.
    ///
    /// The reference is accepted as either a local user id or an identity
    /// provider subject id; local ids are tried first.
    pub async fn resolve_student_ref(&self, student_ref: &str) -> AppResult<Option<user::Model>> {
        if let Some(user) = self.user_repo.find_by_id(student_ref).await? {
            return Ok(Some(user));
        }
        self.user_repo.find_by_auth_uid(student_ref).await
    }

    async fn touch_last_login(&self, user_id: &str) {
        if let Err(e) = self.user_repo.touch_last_login(user_id).await {
            tracing::debug!(error = %e, user_id, "Failed to stamp last_login");
        }
    }
}
