//! Create department table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Department::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Department::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Department::Name).string_len(128).not_null())
                    .to_owned(),
            )
            .await?;

        // Seed the fixed category set
        let seed = Query::insert()
            .into_table(Department::Table)
            .columns([Department::Id, Department::Name])
            .values_panic(["infrastructure".into(), "Infrastructure".into()])
            .values_panic(["it".into(), "IT Department".into()])
            .values_panic(["library".into(), "Library".into()])
            .values_panic(["classroom".into(), "Classroom/Staff-room".into()])
            .to_owned();
        manager.exec_stmt(seed).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Department::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Department {
    Table,
    Id,
    Name,
}
