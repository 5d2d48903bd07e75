//! Database entities.

pub mod admin_code;
pub mod audit_log;
pub mod department;
pub mod disruption;
pub mod disruption_image;
pub mod notification;
pub mod resolution;
pub mod user;

pub use admin_code::Entity as AdminCode;
pub use audit_log::Entity as AuditLog;
pub use department::Entity as Department;
pub use disruption::Entity as Disruption;
pub use disruption_image::Entity as DisruptionImage;
pub use notification::Entity as Notification;
pub use resolution::Entity as Resolution;
pub use user::Entity as User;
