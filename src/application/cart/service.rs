//! Cart and checkout use-cases

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::application::ports::{EmailMessage, Mailer};
use crate::domain::cart::{
    merge_duplicates, normalize_quantity, CartLine, DrinkOptions, OptionFingerprint,
};
use crate::domain::order::{plan_checkout, CheckoutRequest, OrderDetails};
use crate::domain::product::Product;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::format_price;

/// A cart line together with the product it refers to.
#[derive(Debug, Clone)]
pub struct CartEntry {
    pub line: CartLine,
    pub product: Product,
    /// Unit price times quantity, overflow-checked when the cart is read.
    pub line_total_cents: i64,
}

/// Lazy merges lost to a concurrent cart change are retried this many times.
const MERGE_ATTEMPTS: u32 = 3;

fn cart_total_overflow() -> DomainError {
    DomainError::Validation("Cart total overflows".to_string())
}

#[derive(Debug, Clone)]
pub struct CartView {
    pub entries: Vec<CartEntry>,
    pub total_quantity: i64,
    pub total_cents: i64,
}

impl CartView {
    pub fn item_count(&self) -> usize {
        self.entries.len()
    }

    pub fn total_display(&self) -> String {
        format_price(self.total_cents)
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub order: OrderDetails,
    pub payment_instructions: String,
}

/// Shop details shown to buyers after checkout.
#[derive(Debug, Clone)]
pub struct ShopInfo {
    pub name: String,
    pub payment_instructions: String,
}

pub struct CartService {
    repos: Arc<dyn RepositoryProvider>,
    mailer: Arc<dyn Mailer>,
    shop: ShopInfo,
}

impl CartService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, mailer: Arc<dyn Mailer>, shop: ShopInfo) -> Self {
        Self { repos, mailer, shop }
    }

    /// Add `quantity` of a configured drink; an identical active line grows instead.
    pub async fn add_item(
        &self,
        user_id: &str,
        product_id: &str,
        options: DrinkOptions,
        quantity: Option<i64>,
    ) -> DomainResult<CartLine> {
        options.validate()?;
        let quantity = normalize_quantity(quantity.unwrap_or(1))?;

        let product = self
            .repos
            .products()
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Product", "id", product_id))?;
        if !product.available {
            return Err(DomainError::Validation(format!(
                "{} is no longer available",
                product.name
            )));
        }

        let fingerprint = OptionFingerprint {
            product_id: product.id.clone(),
            options,
        };
        let line = self
            .repos
            .carts()
            .add_or_increment(user_id, &fingerprint, quantity)
            .await?;

        metrics::counter!("cart_items_added_total").increment(quantity as u64);
        debug!(user_id, line_id = %line.id, product = %product.name, quantity = line.quantity, "Cart line updated");
        Ok(line)
    }

    /// Active lines with their products. Duplicates left by concurrent adds are merged first.
    pub async fn view_cart(&self, user_id: &str) -> DomainResult<CartView> {
        let lines = self.merged_lines(user_id).await?;
        let products = self.products_for(&lines).await?;

        let mut entries = Vec::with_capacity(lines.len());
        for line in lines {
            let product = products
                .get(&line.product_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("Product", "id", line.product_id.clone()))?;
            let line_total_cents = product
                .price_cents
                .checked_mul(line.quantity as i64)
                .ok_or_else(cart_total_overflow)?;
            entries.push(CartEntry {
                line,
                product,
                line_total_cents,
            });
        }

        let total_quantity = entries.iter().map(|e| e.line.quantity as i64).sum();
        let mut total_cents: i64 = 0;
        for entry in &entries {
            total_cents = total_cents
                .checked_add(entry.line_total_cents)
                .ok_or_else(cart_total_overflow)?;
        }

        Ok(CartView {
            entries,
            total_quantity,
            total_cents,
        })
    }

    pub async fn update_quantity(&self, user_id: &str, line_id: &str, quantity: i64) -> DomainResult<CartLine> {
        let quantity = normalize_quantity(quantity)?;
        self.repos.carts().set_quantity(user_id, line_id, quantity).await
    }

    /// Delete exactly one active line of the user.
    pub async fn remove_line(&self, user_id: &str, line_id: &str) -> DomainResult<()> {
        if !self.repos.carts().delete_line(user_id, line_id).await? {
            return Err(DomainError::not_found("CartLine", "id", line_id));
        }
        debug!(user_id, line_id, "Cart line removed");
        Ok(())
    }

    /// Turn the selected lines (or the whole cart) into a pending order.
    pub async fn checkout(
        &self,
        user_id: &str,
        line_ids: Option<Vec<String>>,
        expected_total_cents: Option<i64>,
    ) -> DomainResult<CheckoutReceipt> {
        let user = self
            .repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))?;

        let cart = self.repos.carts().active_lines(user_id).await?;
        let products = self.products_for(&cart).await?;

        let plan = plan_checkout(
            CheckoutRequest {
                user_id,
                line_ids: line_ids.as_deref(),
                expected_total_cents,
            },
            cart,
            &products,
            uuid::Uuid::new_v4().to_string(),
            Utc::now(),
        )?;

        let order = self.repos.orders().place(&plan).await?;
        metrics::counter!("orders_placed_total").increment(1);
        info!(
            order_id = %order.id,
            user_id,
            lines = plan.consumed_line_ids.len(),
            merged = plan.absorbed_line_ids.len(),
            total_cents = order.total_cents,
            "Order placed"
        );

        let details = OrderDetails {
            order,
            items: plan.items,
            username: user.username.clone(),
        };

        let message = self.confirmation_email(&user.email, &details);
        if let Err(e) = self.mailer.send(message).await {
            warn!(order_id = %details.order.id, error = %e, "Failed to send order confirmation");
        }

        Ok(CheckoutReceipt {
            order: details,
            payment_instructions: self.shop.payment_instructions.clone(),
        })
    }

    async fn merged_lines(&self, user_id: &str) -> DomainResult<Vec<CartLine>> {
        let mut attempt = 1;
        loop {
            let lines = self.repos.carts().active_lines(user_id).await?;
            let outcome = merge_duplicates(lines);
            if outcome.is_noop() {
                return Ok(outcome.lines);
            }

            debug!(user_id, absorbed = outcome.absorbed.len(), "Merging duplicate cart lines");
            match self.repos.carts().apply_merge(&outcome).await {
                Ok(()) => return Ok(outcome.lines),
                Err(DomainError::Conflict(reason)) if attempt < MERGE_ATTEMPTS => {
                    debug!(user_id, attempt, %reason, "Cart changed during merge, re-reading");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn products_for(&self, lines: &[CartLine]) -> DomainResult<HashMap<String, Product>> {
        let mut ids: Vec<String> = lines.iter().map(|l| l.product_id.clone()).collect();
        ids.sort();
        ids.dedup();

        Ok(self
            .repos
            .products()
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect())
    }

    fn confirmation_email(&self, to: &str, details: &OrderDetails) -> EmailMessage {
        let mut body = format!(
            "Thank you for your order at {}!\n\nOrder {}\n\n",
            self.shop.name, details.order.id
        );
        for item in &details.items {
            body.push_str(&format!(
                "  {} x {} ({}): {}\n",
                item.quantity,
                item.product_name,
                item.options,
                format_price(item.line_total_cents())
            ));
        }
        body.push_str(&format!(
            "\nTotal: {}\n\n{}\n",
            format_price(details.order.total_cents),
            self.shop.payment_instructions
        ));

        EmailMessage::text(
            to,
            format!("{}: order confirmation", self.shop.name),
            body,
        )
    }
}
