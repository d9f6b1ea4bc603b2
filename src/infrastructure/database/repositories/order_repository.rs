use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::warn;

use super::cart_repository::options_from_columns;
use super::db_err;
use crate::domain::order::{
    CheckoutPlan, Order, OrderDetails, OrderItem, OrderRepository, OrderStats, OrderStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{cart_line, order, order_item, user};
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach items and buyer usernames to a page of orders, preserving order.
    async fn hydrate(&self, orders: Vec<order::Model>) -> DomainResult<Vec<OrderDetails>> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<String> = orders.iter().map(|o| o.id.clone()).collect();
        let user_ids: Vec<String> = orders.iter().map(|o| o.user_id.clone()).collect();

        let item_models = order_item::Entity::find()
            .filter(order_item::Column::OrderId.is_in(order_ids))
            .order_by_asc(order_item::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut items: HashMap<String, Vec<OrderItem>> = HashMap::new();
        for model in item_models {
            let order_id = model.order_id.clone();
            items.entry(order_id).or_default().push(item_model_to_domain(model)?);
        }

        let usernames: HashMap<String, String> = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(orders
            .into_iter()
            .map(|model| {
                let username = usernames.get(&model.user_id).cloned().unwrap_or_default();
                let items = items.remove(&model.id).unwrap_or_default();
                OrderDetails {
                    order: order_model_to_domain(model),
                    items,
                    username,
                }
            })
            .collect())
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_status_to_domain(status: order::OrderStatus) -> OrderStatus {
    match status {
        order::OrderStatus::Pending => OrderStatus::Pending,
        order::OrderStatus::Paid => OrderStatus::Paid,
        order::OrderStatus::Shipped => OrderStatus::Shipped,
    }
}

fn domain_status_to_entity(status: OrderStatus) -> order::OrderStatus {
    match status {
        OrderStatus::Pending => order::OrderStatus::Pending,
        OrderStatus::Paid => order::OrderStatus::Paid,
        OrderStatus::Shipped => order::OrderStatus::Shipped,
    }
}

fn order_model_to_domain(model: order::Model) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        status: entity_status_to_domain(model.status),
        total_cents: model.total_cents,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn item_model_to_domain(model: order_item::Model) -> DomainResult<OrderItem> {
    Ok(OrderItem {
        options: options_from_columns(&model.topping, model.sugar, &model.ice, &model.size)?,
        order_id: model.order_id,
        cart_line_id: model.cart_line_id,
        product_id: model.product_id,
        product_name: model.product_name,
        unit_price_cents: model.unit_price_cents,
        quantity: model.quantity,
    })
}

fn stale_cart() -> DomainError {
    DomainError::Conflict("Cart changed during checkout, please review it and retry".to_string())
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn place(&self, plan: &CheckoutPlan) -> DomainResult<Order> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now();
        let user_id = plan.order.user_id.as_str();

        let model = order::ActiveModel {
            id: Set(plan.order.id.clone()),
            user_id: Set(plan.order.user_id.clone()),
            status: Set(domain_status_to_entity(plan.order.status)),
            total_cents: Set(plan.order.total_cents),
            created_at: Set(plan.order.created_at),
            updated_at: Set(plan.order.updated_at),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        // Each line must still be active with the quantity that was priced;
        // otherwise another checkout or a concurrent add got there first.
        let observed = |id: &str| {
            plan.observed_quantities
                .get(id)
                .copied()
                .ok_or_else(stale_cart)
        };

        for item in &plan.items {
            let result = cart_line::Entity::update_many()
                .col_expr(
                    cart_line::Column::Status,
                    Expr::value(cart_line::CartLineStatus::CheckedOut),
                )
                .col_expr(cart_line::Column::OrderId, Expr::value(plan.order.id.clone()))
                .col_expr(cart_line::Column::Quantity, Expr::value(item.quantity))
                .col_expr(cart_line::Column::UpdatedAt, Expr::value(now))
                .filter(cart_line::Column::Id.eq(item.cart_line_id.as_str()))
                .filter(cart_line::Column::UserId.eq(user_id))
                .filter(cart_line::Column::Status.eq(cart_line::CartLineStatus::Active))
                .filter(cart_line::Column::Quantity.eq(observed(item.cart_line_id.as_str())?))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            if result.rows_affected != 1 {
                warn!(order_id = %plan.order.id, line_id = %item.cart_line_id, "Cart line changed since checkout was planned, rolling back");
                return Err(stale_cart());
            }
        }

        for line_id in &plan.absorbed_line_ids {
            let result = cart_line::Entity::delete_many()
                .filter(cart_line::Column::Id.eq(line_id.as_str()))
                .filter(cart_line::Column::UserId.eq(user_id))
                .filter(cart_line::Column::Status.eq(cart_line::CartLineStatus::Active))
                .filter(cart_line::Column::Quantity.eq(observed(line_id.as_str())?))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            if result.rows_affected != 1 {
                warn!(order_id = %plan.order.id, %line_id, "Absorbed cart line changed since checkout was planned, rolling back");
                return Err(stale_cart());
            }
        }

        let items = plan.items.iter().map(|item| order_item::ActiveModel {
            order_id: Set(item.order_id.clone()),
            cart_line_id: Set(item.cart_line_id.clone()),
            product_id: Set(item.product_id.clone()),
            product_name: Set(item.product_name.clone()),
            unit_price_cents: Set(item.unit_price_cents),
            quantity: Set(item.quantity),
            topping: Set(item.options.topping.as_str().to_string()),
            sugar: Set(item.options.sugar as i32),
            ice: Set(item.options.ice.as_str().to_string()),
            size: Set(item.options.size.as_str().to_string()),
            ..Default::default()
        });
        order_item::Entity::insert_many(items)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(order_model_to_domain(model))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<OrderDetails>> {
        let Some(model) = order::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![model]).await?.into_iter().next())
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<OrderDetails>> {
        let models = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        self.hydrate(models).await
    }

    async fn list(
        &self,
        status: Option<OrderStatus>,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<OrderDetails>> {
        let mut query = order::Entity::find();
        if let Some(status) = status {
            query = query.filter(order::Column::Status.eq(domain_status_to_entity(status)));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_desc(order::Column::CreatedAt)
            .offset(pagination.offset())
            .limit(pagination.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = self.hydrate(models).await?;
        Ok(PaginatedResult::new(items, total, pagination.page, pagination.limit))
    }

    async fn update_status(&self, id: &str, from: OrderStatus, to: OrderStatus) -> DomainResult<Order> {
        let result = order::Entity::update_many()
            .col_expr(order::Column::Status, Expr::value(domain_status_to_entity(to)))
            .col_expr(order::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(order::Column::Id.eq(id))
            .filter(order::Column::Status.eq(domain_status_to_entity(from)))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        let current = order::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Order", "id", id))?;

        if result.rows_affected == 0 {
            return Err(DomainError::Conflict(format!(
                "Order status changed concurrently, it is now {}",
                entity_status_to_domain(current.status)
            )));
        }

        Ok(order_model_to_domain(current))
    }

    async fn stats(&self) -> DomainResult<OrderStats> {
        let count = |status: order::OrderStatus| {
            order::Entity::find()
                .filter(order::Column::Status.eq(status))
                .count(&self.db)
        };

        let pending = count(order::OrderStatus::Pending).await.map_err(db_err)?;
        let paid = count(order::OrderStatus::Paid).await.map_err(db_err)?;
        let shipped = count(order::OrderStatus::Shipped).await.map_err(db_err)?;

        let settled: Vec<i64> = order::Entity::find()
            .select_only()
            .column(order::Column::TotalCents)
            .filter(
                order::Column::Status
                    .is_in([order::OrderStatus::Paid, order::OrderStatus::Shipped]),
            )
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(OrderStats {
            pending,
            paid,
            shipped,
            revenue_cents: settled.into_iter().sum(),
        })
    }
}
