//! Admin dashboard DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::application::Dashboard;
use crate::shared::format_price;

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderCountsDto {
    pub pending: u64,
    pub paid: u64,
    pub shipped: u64,
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardDto {
    pub product_count: u64,
    pub user_count: u64,
    pub orders: OrderCountsDto,
    /// Sum of paid and shipped order totals
    pub revenue_cents: i64,
    pub revenue: String,
}

impl From<Dashboard> for DashboardDto {
    fn from(d: Dashboard) -> Self {
        Self {
            product_count: d.product_count,
            user_count: d.user_count,
            orders: OrderCountsDto {
                pending: d.orders.pending,
                paid: d.orders.paid,
                shipped: d.orders.shipped,
                total: d.orders.total(),
            },
            revenue_cents: d.orders.revenue_cents,
            revenue: format_price(d.orders.revenue_cents),
        }
    }
}
