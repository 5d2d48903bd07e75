//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_department_table;
mod m20250601_000002_create_user_table;
mod m20250601_000003_create_disruption_table;
mod m20250601_000004_create_resolution_table;
mod m20250601_000005_create_disruption_image_table;
mod m20250601_000006_create_notification_table;
mod m20250601_000007_create_admin_code_table;
mod m20250601_000008_create_audit_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_department_table::Migration),
            Box::new(m20250601_000002_create_user_table::Migration),
            Box::new(m20250601_000003_create_disruption_table::Migration),
            Box::new(m20250601_000004_create_resolution_table::Migration),
            Box::new(m20250601_000005_create_disruption_image_table::Migration),
            Box::new(m20250601_000006_create_notification_table::Migration),
            Box::new(m20250601_000007_create_admin_code_table::Migration),
            Box::new(m20250601_000008_create_audit_log_table::Migration),
        ]
    }
}
