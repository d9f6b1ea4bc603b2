//! Create cart_lines table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;
use super::m20240101_000002_create_products::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CartLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CartLines::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(CartLines::UserId).string().not_null())
                    .col(ColumnDef::new(CartLines::ProductId).string().not_null())
                    .col(
                        ColumnDef::new(CartLines::Topping)
                            .string_len(20)
                            .not_null()
                            .default("none"),
                    )
                    .col(
                        ColumnDef::new(CartLines::Sugar)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(CartLines::Ice)
                            .string_len(20)
                            .not_null()
                            .default("general"),
                    )
                    .col(
                        ColumnDef::new(CartLines::Size)
                            .string_len(20)
                            .not_null()
                            .default("regular"),
                    )
                    .col(
                        ColumnDef::new(CartLines::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(CartLines::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(CartLines::OrderId).string())
                    .col(
                        ColumnDef::new(CartLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CartLines::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_lines_user")
                            .from(CartLines::Table, CartLines::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_lines_product")
                            .from(CartLines::Table, CartLines::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cart_lines_user_status")
                    .table(CartLines::Table)
                    .col(CartLines::UserId)
                    .col(CartLines::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CartLines::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CartLines {
    Table,
    Id,
    UserId,
    ProductId,
    Topping,
    Sugar,
    Ice,
    Size,
    Quantity,
    Status,
    OrderId,
    CreatedAt,
    UpdatedAt,
}
