//! Create resolution table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Resolution::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Resolution::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Resolution::DisruptionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Resolution::ResolvedBy)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Resolution::ResolutionDescription)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Resolution::ResolutionImageUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Resolution::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_resolution_disruption")
                            .from(Resolution::Table, Resolution::DisruptionId)
                            .to(Disruption::Table, Disruption::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_resolution_resolved_by")
                            .from(Resolution::Table, Resolution::ResolvedBy)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: disruption_id (resolution history lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_resolution_disruption_id")
                    .table(Resolution::Table)
                    .col(Resolution::DisruptionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Resolution::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Resolution {
    Table,
    Id,
    DisruptionId,
    ResolvedBy,
    ResolutionDescription,
    ResolutionImageUrl,
    CreatedAt,
}

#[derive(Iden)]
enum Disruption {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
