//! Create disruption table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Disruption::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Disruption::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Disruption::DisruptionId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Disruption::StudentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Disruption::StudentName).string_len(256))
                    .col(ColumnDef::new(Disruption::StudentEmail).string_len(256))
                    .col(
                        ColumnDef::new(Disruption::Category)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Disruption::Priority)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Disruption::Description).text().not_null())
                    .col(
                        ColumnDef::new(Disruption::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Disruption::AiTone).string_len(32))
                    .col(ColumnDef::new(Disruption::AiConfidence).double())
                    .col(ColumnDef::new(Disruption::AiRecommendation).text())
                    .col(
                        ColumnDef::new(Disruption::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Disruption::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Disruption::ResolvedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Disruption::ResolvedBy).string_len(32))
                    .col(
                        ColumnDef::new(Disruption::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_disruption_student")
                            .from(Disruption::Table, Disruption::StudentId)
                            .to(User::Table, User::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_disruption_category")
                            .from(Disruption::Table, Disruption::Category)
                            .to(Department::Table, Department::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_disruption_resolved_by")
                            .from(Disruption::Table, Disruption::ResolvedBy)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: business id (duplicate creates must lose the race here)
        manager
            .create_index(
                Index::create()
                    .name("idx_disruption_disruption_id")
                    .table(Disruption::Table)
                    .col(Disruption::DisruptionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: student_id (student listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_disruption_student_id")
                    .table(Disruption::Table)
                    .col(Disruption::StudentId)
                    .to_owned(),
            )
            .await?;

        // Index: category (admin listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_disruption_category")
                    .table(Disruption::Table)
                    .col(Disruption::Category)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (newest-first ordering)
        manager
            .create_index(
                Index::create()
                    .name("idx_disruption_created_at")
                    .table(Disruption::Table)
                    .col(Disruption::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Disruption::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Disruption {
    Table,
    Id,
    DisruptionId,
    StudentId,
    StudentName,
    StudentEmail,
    Category,
    Priority,
    Description,
    Status,
    AiTone,
    AiConfidence,
    AiRecommendation,
    CreatedAt,
    UpdatedAt,
    ResolvedAt,
    ResolvedBy,
    IsDeleted,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Department {
    Table,
    Id,
}
