//! Database repositories.

mod admin_code;
mod audit_log;
mod department;
mod disruption;
mod notification;
mod user;

pub use admin_code::AdminCodeRepository;
pub use audit_log::AuditLogRepository;
pub use department::DepartmentRepository;
pub use disruption::DisruptionRepository;
pub use notification::NotificationRepository;
pub use user::UserRepository;

use campusflow_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map a unique-constraint violation to `Conflict`; everything else is a
/// store failure. Duplicate-insert races must never overwrite silently.
pub(crate) fn conflict_on_unique(e: DbErr, what: &str) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict(format!("{what} already exists"))
        }
        _ => AppError::Database(e.to_string()),
    }
}
