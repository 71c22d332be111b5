use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing is always newest first.
        manager
            .create_index(
                Index::create()
                    .table(Registrations::Table)
                    .col(Registrations::CreatedAt)
                    .name("idx_registrations_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_registrations_created_at").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Registrations {
    Table,
    CreatedAt,
}
