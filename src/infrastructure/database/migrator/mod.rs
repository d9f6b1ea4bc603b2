//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_products;
mod m20240101_000003_create_product_images;
mod m20240101_000004_create_cart_lines;
mod m20240101_000005_create_orders;
mod m20240101_000006_create_order_items;
mod m20240101_000007_create_verifications;
mod m20240101_000008_create_user_images;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_products::Migration),
            Box::new(m20240101_000003_create_product_images::Migration),
            Box::new(m20240101_000004_create_cart_lines::Migration),
            Box::new(m20240101_000005_create_orders::Migration),
            Box::new(m20240101_000006_create_order_items::Migration),
            Box::new(m20240101_000007_create_verifications::Migration),
            Box::new(m20240101_000008_create_user_images::Migration),
        ]
    }
}
