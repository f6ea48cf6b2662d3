use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Record::Table)
                    .if_not_exists()
                    .col(string(Record::Id).primary_key())
                    .col(string(Record::RecordType).not_null())
                    .col(json(Record::Data).not_null())
                    .col(
                        timestamp(Record::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp(Record::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Task recovery loads every record of one type at startup
        manager
            .create_index(
                Index::create()
                    .name("idx_record_record_type")
                    .table(Record::Table)
                    .col(Record::RecordType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_record_record_type")
                    .table(Record::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Record::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Record {
    Table,
    Id,
    RecordType,
    Data,
    CreatedAt,
    UpdatedAt,
}
