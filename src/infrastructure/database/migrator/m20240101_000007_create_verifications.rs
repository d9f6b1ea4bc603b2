//! Create verifications table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Verifications::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Verifications::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Verifications::Kind).string_len(20).not_null())
                    .col(ColumnDef::new(Verifications::Target).string().not_null())
                    .col(ColumnDef::new(Verifications::CodeHash).string().not_null())
                    .col(
                        ColumnDef::new(Verifications::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Verifications::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Verifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One pending code per (kind, target)
        manager
            .create_index(
                Index::create()
                    .name("idx_verifications_kind_target")
                    .table(Verifications::Table)
                    .col(Verifications::Kind)
                    .col(Verifications::Target)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Verifications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Verifications {
    Table,
    Id,
    Kind,
    Target,
    CodeHash,
    Attempts,
    ExpiresAt,
    CreatedAt,
}
