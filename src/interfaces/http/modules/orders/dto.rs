//! Order DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::CheckoutReceipt;
use crate::domain::{DrinkOptions, OrderDetails, OrderItem, OrderStatus};
use crate::shared::format_price;

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemDto {
    pub cart_line_id: String,
    pub product_id: String,
    pub product_name: String,
    pub options: DrinkOptions,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl From<OrderItem> for OrderItemDto {
    fn from(item: OrderItem) -> Self {
        Self {
            line_total_cents: item.line_total_cents(),
            cart_line_id: item.cart_line_id,
            product_id: item.product_id,
            product_name: item.product_name,
            options: item.options,
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDto {
    pub id: String,
    pub user_id: String,
    /// Buyer's username
    pub username: String,
    pub status: OrderStatus,
    pub total_cents: i64,
    /// Display total, e.g. `12.50$`
    pub total: String,
    /// Cart lines consumed by this order
    pub line_ids: Vec<String>,
    pub items: Vec<OrderItemDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderDetails> for OrderDto {
    fn from(details: OrderDetails) -> Self {
        let line_ids = details.line_ids();
        let order = details.order;
        Self {
            id: order.id,
            user_id: order.user_id,
            username: details.username,
            status: order.status,
            total_cents: order.total_cents,
            total: format_price(order.total_cents),
            line_ids,
            items: details.items.into_iter().map(OrderItemDto::from).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutReceiptDto {
    pub order: OrderDto,
    pub payment_instructions: String,
}

impl From<CheckoutReceipt> for CheckoutReceiptDto {
    fn from(receipt: CheckoutReceipt) -> Self {
        Self {
            order: OrderDto::from(receipt.order),
            payment_instructions: receipt.payment_instructions,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListOrdersParams {
    /// Filter by status (pending, paid, shipped)
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}
