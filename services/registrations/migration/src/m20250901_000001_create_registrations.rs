use sea_orm_migration::prelude::*;

use hackreg_registrations_schema::registrations::{TEAM_NAME_KEY_INDEX, TEAM_NUMBER_INDEX};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registrations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Registrations::TeamName).string().not_null())
                    .col(ColumnDef::new(Registrations::TeamNameKey).string().not_null())
                    .col(ColumnDef::new(Registrations::HeadName).string().not_null())
                    .col(ColumnDef::new(Registrations::HeadEmail).string().not_null())
                    .col(ColumnDef::new(Registrations::Password).string().not_null())
                    .col(ColumnDef::new(Registrations::HeadRegNo).string().not_null())
                    .col(ColumnDef::new(Registrations::Contact).string().not_null())
                    .col(ColumnDef::new(Registrations::AltContact).string())
                    .col(ColumnDef::new(Registrations::Member1Name).string().not_null())
                    .col(ColumnDef::new(Registrations::Member1Reg).string().not_null())
                    .col(ColumnDef::new(Registrations::Member2Name).string().not_null())
                    .col(ColumnDef::new(Registrations::Member2Reg).string().not_null())
                    .col(ColumnDef::new(Registrations::TeamNumber).string().not_null())
                    .col(
                        ColumnDef::new(Registrations::Round2)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Registrations::CertificateSent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Registrations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Uniqueness is decided here, not by the service's pre-checks.
        manager
            .create_index(
                Index::create()
                    .table(Registrations::Table)
                    .col(Registrations::TeamNameKey)
                    .name(TEAM_NAME_KEY_INDEX)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Registrations::Table)
                    .col(Registrations::TeamNumber)
                    .name(TEAM_NUMBER_INDEX)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registrations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Registrations {
    Table,
    Id,
    TeamName,
    TeamNameKey,
    HeadName,
    HeadEmail,
    Password,
    HeadRegNo,
    Contact,
    AltContact,
    #[iden = "member1_name"]
    Member1Name,
    #[iden = "member1_reg"]
    Member1Reg,
    #[iden = "member2_name"]
    Member2Name,
    #[iden = "member2_reg"]
    Member2Reg,
    TeamNumber,
    #[iden = "round2"]
    Round2,
    CertificateSent,
    CreatedAt,
}
