//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::cart::CartRepository;
use crate::domain::order::OrderRepository;
use crate::domain::product::ProductRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::UserRepository;
use crate::domain::verification::VerificationRepository;

use super::cart_repository::SeaOrmCartRepository;
use super::order_repository::SeaOrmOrderRepository;
use super::product_repository::SeaOrmProductRepository;
use super::user_repository::SeaOrmUserRepository;
use super::verification_repository::SeaOrmVerificationRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let lines = repos.carts().active_lines(&user_id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    products: SeaOrmProductRepository,
    carts: SeaOrmCartRepository,
    orders: SeaOrmOrderRepository,
    verifications: SeaOrmVerificationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            products: SeaOrmProductRepository::new(db.clone()),
            carts: SeaOrmCartRepository::new(db.clone()),
            orders: SeaOrmOrderRepository::new(db.clone()),
            verifications: SeaOrmVerificationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn products(&self) -> &dyn ProductRepository {
        &self.products
    }

    fn carts(&self) -> &dyn CartRepository {
        &self.carts
    }

    fn orders(&self) -> &dyn OrderRepository {
        &self.orders
    }

    fn verifications(&self) -> &dyn VerificationRepository {
        &self.verifications
    }
}
