//! Product repository interface

use async_trait::async_trait;

use super::model::{NewProduct, Product, ProductChanges, ProductImage, ProductQuery};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: NewProduct) -> DomainResult<Product>;
    async fn update(&self, id: &str, changes: ProductChanges) -> DomainResult<Product>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Product>>;
    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Product>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Product>>;
    /// Available products only.
    async fn list(&self, query: ProductQuery) -> DomainResult<PaginatedResult<Product>>;
    /// Mark unavailable and drop it from active carts. Returns removed cart lines.
    async fn retire(&self, id: &str) -> DomainResult<u64>;
    async fn image(&self, product_id: &str) -> DomainResult<Option<ProductImage>>;
    async fn count_available(&self) -> DomainResult<u64>;
}
