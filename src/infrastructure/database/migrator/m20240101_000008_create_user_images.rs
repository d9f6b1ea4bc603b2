//! Create user_images table and the users.image_id pointer

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserImages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserImages::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(UserImages::UserId).string().not_null().unique_key())
                    .col(ColumnDef::new(UserImages::ContentType).string().not_null())
                    .col(ColumnDef::new(UserImages::Data).blob().not_null())
                    .col(
                        ColumnDef::new(UserImages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_images_user")
                            .from(UserImages::Table, UserImages::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .add_column(ColumnDef::new(Users::ImageId).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .drop_column(Users::ImageId)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UserImages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum UserImages {
    Table,
    Id,
    UserId,
    ContentType,
    Data,
    CreatedAt,
}
