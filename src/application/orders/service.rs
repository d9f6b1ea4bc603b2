//! Order history and admin order management

use std::sync::Arc;

use tracing::info;

use crate::domain::order::{OrderDetails, OrderStats, OrderStatus};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{PaginatedResult, PaginationParams};

/// Admin dashboard figures.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard {
    pub product_count: u64,
    pub user_count: u64,
    pub orders: OrderStats,
}

pub struct OrderService {
    repos: Arc<dyn RepositoryProvider>,
}

impl OrderService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// The user's orders, newest first.
    pub async fn history(&self, user_id: &str) -> DomainResult<Vec<OrderDetails>> {
        self.repos.orders().list_for_user(user_id).await
    }

    /// One of the user's own orders. Someone else's order is reported as missing.
    pub async fn order_for_user(&self, user_id: &str, order_id: &str) -> DomainResult<OrderDetails> {
        self.repos
            .orders()
            .find_by_id(order_id)
            .await?
            .filter(|o| o.order.user_id == user_id)
            .ok_or_else(|| DomainError::not_found("Order", "id", order_id))
    }

    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<OrderDetails>> {
        self.repos.orders().list(status, pagination).await
    }

    pub async fn order_detail(&self, order_id: &str) -> DomainResult<OrderDetails> {
        self.repos
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", "id", order_id))
    }

    /// Move an order forward. Setting the current status again changes nothing.
    pub async fn update_status(&self, order_id: &str, target: OrderStatus) -> DomainResult<OrderDetails> {
        let mut details = self.order_detail(order_id).await?;
        let current = details.order.status;

        if !current.check_transition(target)? {
            return Ok(details);
        }

        details.order = self
            .repos
            .orders()
            .update_status(order_id, current, target)
            .await?;

        metrics::counter!("order_status_changes_total", "from" => current.as_str(), "to" => target.as_str())
            .increment(1);
        info!(order_id, from = %current, to = %target, "Order status changed");
        Ok(details)
    }

    pub async fn dashboard(&self) -> DomainResult<Dashboard> {
        Ok(Dashboard {
            product_count: self.repos.products().count_available().await?,
            user_count: self.repos.users().count_users().await?,
            orders: self.repos.orders().stats().await?,
        })
    }
}
