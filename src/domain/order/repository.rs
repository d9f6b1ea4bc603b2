//! Order repository interface

use async_trait::async_trait;

use super::checkout::CheckoutPlan;
use super::model::{Order, OrderDetails, OrderStats, OrderStatus};
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a checkout in one transaction.
    ///
    /// Fails with `Conflict` if any consumed line is no longer active.
    async fn place(&self, plan: &CheckoutPlan) -> DomainResult<Order>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<OrderDetails>>;
    /// Newest first.
    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<OrderDetails>>;
    /// Newest first.
    async fn list(
        &self,
        status: Option<OrderStatus>,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<OrderDetails>>;
    /// Compare-and-set: only applies while the order is still in `from`.
    async fn update_status(&self, id: &str, from: OrderStatus, to: OrderStatus) -> DomainResult<Order>;
    async fn stats(&self) -> DomainResult<OrderStats>;
}
