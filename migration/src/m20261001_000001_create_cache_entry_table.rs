use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CacheEntry::Table)
                    .if_not_exists()
                    .col(string(CacheEntry::Domain))
                    .col(string(CacheEntry::Key))
                    .col(text(CacheEntry::Payload))
                    .col(timestamp_with_time_zone(CacheEntry::FetchedAt))
                    .primary_key(
                        Index::create()
                            .col(CacheEntry::Domain)
                            .col(CacheEntry::Key),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CacheEntry::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CacheEntry {
    Table,
    Domain,
    Key,
    Payload,
    FetchedAt,
}
