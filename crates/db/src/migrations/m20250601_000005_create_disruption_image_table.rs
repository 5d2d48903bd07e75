//! Create disruption image table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DisruptionImage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DisruptionImage::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DisruptionImage::DisruptionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DisruptionImage::Url)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DisruptionImage::Filename).string_len(256))
                    .col(ColumnDef::new(DisruptionImage::Filesize).string_len(32))
                    .col(
                        ColumnDef::new(DisruptionImage::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_disruption_image_disruption")
                            .from(DisruptionImage::Table, DisruptionImage::DisruptionId)
                            .to(Disruption::Table, Disruption::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: disruption_id (image lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_disruption_image_disruption_id")
                    .table(DisruptionImage::Table)
                    .col(DisruptionImage::DisruptionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DisruptionImage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DisruptionImage {
    Table,
    Id,
    DisruptionId,
    Url,
    Filename,
    Filesize,
    UploadedAt,
}

#[derive(Iden)]
enum Disruption {
    Table,
    Id,
}
