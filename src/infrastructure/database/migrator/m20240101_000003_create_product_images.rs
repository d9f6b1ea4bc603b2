//! Create product_images table

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_products::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductImages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProductImages::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(ProductImages::ProductId).string().not_null())
                    .col(ColumnDef::new(ProductImages::ContentType).string().not_null())
                    .col(ColumnDef::new(ProductImages::Data).blob().not_null())
                    .col(
                        ColumnDef::new(ProductImages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_images_product")
                            .from(ProductImages::Table, ProductImages::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductImages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ProductImages {
    Table,
    Id,
    ProductId,
    ContentType,
    Data,
    CreatedAt,
}
