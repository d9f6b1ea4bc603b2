//! Order domain entity and status lifecycle

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::cart::DrinkOptions;
use crate::shared::errors::DomainError;

/// Order status. Payment is manual, so an admin moves orders forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [Self::Pending, Self::Paid, Self::Shipped];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
        }
    }

    /// Forward-only: nothing ever returns to `pending`.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Paid) | (Self::Pending, Self::Shipped) | (Self::Paid, Self::Shipped)
        )
    }

    /// Validate a status change. `Ok(false)` means the order already has `target`.
    pub fn check_transition(&self, target: OrderStatus) -> Result<bool, DomainError> {
        if *self == target {
            return Ok(false);
        }
        if self.can_transition_to(target) {
            Ok(true)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: target.to_string(),
            })
        }
    }

    /// Counts towards revenue.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Paid | Self::Shipped)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "shipped" => Ok(Self::Shipped),
            other => Err(DomainError::Validation(format!("Unknown order status: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One consumed cart line, snapshotted at checkout.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub order_id: String,
    pub cart_line_id: String,
    pub product_id: String,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub options: DrinkOptions,
}

impl OrderItem {
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity as i64
    }
}

/// An order with its items and the buyer's username.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub username: String,
}

impl OrderDetails {
    /// Cart line ids the order consumed.
    pub fn line_ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.cart_line_id.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrderStats {
    pub pending: u64,
    pub paid: u64,
    pub shipped: u64,
    /// Sum of totals of paid and shipped orders, in cents.
    pub revenue_cents: i64,
}

impl OrderStats {
    pub fn total(&self) -> u64 {
        self.pending + self.paid + self.shipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Paid));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Paid.can_transition_to(OrderStatus::Shipped));
    }

    #[test]
    fn nothing_returns_to_pending() {
        for from in OrderStatus::ALL {
            if from != OrderStatus::Pending {
                assert!(from.check_transition(OrderStatus::Pending).is_err());
            }
        }
        assert!(OrderStatus::Shipped.check_transition(OrderStatus::Paid).is_err());
    }

    #[test]
    fn same_status_is_a_noop() {
        for status in OrderStatus::ALL {
            assert_eq!(status.check_transition(status).unwrap(), false);
        }
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("PAID".parse::<OrderStatus>().unwrap(), OrderStatus::Paid);
        assert!("refunded".parse::<OrderStatus>().is_err());
    }
}
