use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InstanceLock::Table)
                    .if_not_exists()
                    .col(string(InstanceLock::Duty).primary_key())
                    .col(string_null(InstanceLock::OwnerId))
                    .col(string(InstanceLock::ProcessId))
                    .col(timestamp_with_time_zone_null(InstanceLock::ExpiresAt))
                    .col(timestamp_with_time_zone(InstanceLock::AcquiredAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InstanceLock::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InstanceLock {
    Table,
    Duty,
    OwnerId,
    ProcessId,
    ExpiresAt,
    AcquiredAt,
}
