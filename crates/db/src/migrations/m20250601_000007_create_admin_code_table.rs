//! Create admin code table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminCode::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminCode::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminCode::DepartmentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdminCode::Code).string_len(64).not_null())
                    .col(
                        ColumnDef::new(AdminCode::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(AdminCode::ExpiresAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(AdminCode::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_admin_code_department")
                            .from(AdminCode::Table, AdminCode::DepartmentId)
                            .to(Department::Table, Department::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: code (redemption lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_admin_code_code")
                    .table(AdminCode::Table)
                    .col(AdminCode::Code)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminCode::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AdminCode {
    Table,
    Id,
    DepartmentId,
    Code,
    CreatedAt,
    ExpiresAt,
    IsActive,
}

#[derive(Iden)]
enum Department {
    Table,
    Id,
}
