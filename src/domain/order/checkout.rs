//! Checkout planning
//!
//! Turns a user's cart lines into an order without touching storage. The
//! repository persists the resulting plan atomically.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use super::model::{Order, OrderItem, OrderStatus};
use crate::domain::cart::{merge_duplicates, CartLine};
use crate::domain::product::Product;
use crate::shared::errors::DomainError;

/// Everything needed to persist one checkout.
#[derive(Debug, Clone)]
pub struct CheckoutPlan {
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// Lines marked checked out with the order id.
    pub consumed_line_ids: Vec<String>,
    /// Duplicate lines folded into a consumed line; deleted.
    pub absorbed_line_ids: Vec<String>,
    /// Consumed lines whose quantity grew through merging.
    pub merged_quantities: Vec<(String, i32)>,
    /// Quantity of every selected line as read when planning. Persisting is
    /// refused if any of them changed since.
    pub observed_quantities: HashMap<String, i32>,
}

pub struct CheckoutRequest<'a> {
    pub user_id: &'a str,
    /// Explicit line selection; `None` takes the whole cart.
    pub line_ids: Option<&'a [String]>,
    /// Total the client saw. A mismatch means the cart changed underneath it.
    pub expected_total_cents: Option<i64>,
}

/// Build the order for `request` from the user's active `cart` lines.
///
/// `products` must contain every product referenced by the cart.
pub fn plan_checkout(
    request: CheckoutRequest<'_>,
    cart: Vec<CartLine>,
    products: &HashMap<String, Product>,
    order_id: String,
    now: DateTime<Utc>,
) -> Result<CheckoutPlan, DomainError> {
    let selected = select_lines(request.user_id, request.line_ids, cart)?;
    if selected.is_empty() {
        return Err(DomainError::Validation("Cart is empty".to_string()));
    }

    let merged = merge_duplicates(selected);

    let mut items = Vec::with_capacity(merged.lines.len());
    let mut total: i64 = 0;
    for line in &merged.lines {
        let product = products
            .get(&line.product_id)
            .ok_or_else(|| DomainError::not_found("Product", "id", line.product_id.clone()))?;
        if !product.available {
            return Err(DomainError::Validation(format!(
                "{} is no longer available",
                product.name
            )));
        }

        let line_total = product
            .price_cents
            .checked_mul(line.quantity as i64)
            .ok_or_else(|| DomainError::Validation("Order total overflows".to_string()))?;
        total = total
            .checked_add(line_total)
            .ok_or_else(|| DomainError::Validation("Order total overflows".to_string()))?;

        items.push(OrderItem {
            order_id: order_id.clone(),
            cart_line_id: line.id.clone(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity: line.quantity,
            options: line.options,
        });
    }

    if let Some(expected) = request.expected_total_cents {
        if expected != total {
            return Err(DomainError::Conflict(format!(
                "Cart total changed: expected {} but is {}",
                expected, total
            )));
        }
    }

    Ok(CheckoutPlan {
        order: Order {
            id: order_id,
            user_id: request.user_id.to_string(),
            status: OrderStatus::Pending,
            total_cents: total,
            created_at: now,
            updated_at: now,
        },
        consumed_line_ids: merged.lines.iter().map(|l| l.id.clone()).collect(),
        absorbed_line_ids: merged.absorbed,
        merged_quantities: merged.updated,
        observed_quantities: merged.observed,
        items,
    })
}

fn select_lines(
    user_id: &str,
    line_ids: Option<&[String]>,
    cart: Vec<CartLine>,
) -> Result<Vec<CartLine>, DomainError> {
    let active = cart
        .into_iter()
        .filter(|l| l.user_id == user_id && l.is_active());

    let Some(ids) = line_ids else {
        return Ok(active.collect());
    };

    let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let selected: Vec<CartLine> = active.filter(|l| wanted.contains(l.id.as_str())).collect();
    if selected.len() != wanted.len() {
        let found: HashSet<&str> = selected.iter().map(|l| l.id.as_str()).collect();
        let missing = wanted
            .iter()
            .find(|id| !found.contains(**id))
            .map(|id| id.to_string())
            .unwrap_or_default();
        return Err(DomainError::not_found("CartLine", "id", missing));
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::{CartLineStatus, CupSize, DrinkOptions};
    use chrono::Duration;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Drink {}", id),
            description: None,
            price_cents: price,
            featured: false,
            available: true,
            image_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(id: &str, product: &str, options: DrinkOptions, qty: i32, age: i64) -> CartLine {
        let at = Utc::now() - Duration::seconds(age);
        CartLine {
            id: id.to_string(),
            user_id: "u1".to_string(),
            product_id: product.to_string(),
            options,
            quantity: qty,
            status: CartLineStatus::Active,
            order_id: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn catalog() -> HashMap<String, Product> {
        [product("tea", 250), product("cafe", 300)]
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect()
    }

    fn whole_cart() -> CheckoutRequest<'static> {
        CheckoutRequest {
            user_id: "u1",
            line_ids: None,
            expected_total_cents: None,
        }
    }

    #[test]
    fn total_is_sum_over_consumed_lines() {
        let big = DrinkOptions {
            size: CupSize::Big,
            ..Default::default()
        };
        let cart = vec![
            line("l1", "tea", DrinkOptions::default(), 2, 30),
            line("l2", "cafe", big, 3, 20),
        ];
        let plan = plan_checkout(whole_cart(), cart, &catalog(), "o1".into(), Utc::now()).unwrap();

        assert_eq!(plan.order.total_cents, 2 * 250 + 3 * 300);
        let summed: i64 = plan.items.iter().map(|i| i.line_total_cents()).sum();
        assert_eq!(plan.order.total_cents, summed);
        assert_eq!(plan.consumed_line_ids, vec!["l1".to_string(), "l2".to_string()]);
        let item_lines: Vec<_> = plan.items.iter().map(|i| i.cart_line_id.clone()).collect();
        assert_eq!(item_lines, plan.consumed_line_ids);
    }

    #[test]
    fn duplicates_are_merged_before_pricing() {
        let opts = DrinkOptions::default();
        let cart = vec![line("l1", "tea", opts, 1, 30), line("l2", "tea", opts, 2, 10)];
        let plan = plan_checkout(whole_cart(), cart, &catalog(), "o1".into(), Utc::now()).unwrap();

        assert_eq!(plan.items.len(), 1);
        assert_eq!(plan.items[0].quantity, 3);
        assert_eq!(plan.absorbed_line_ids, vec!["l2".to_string()]);
        assert_eq!(plan.merged_quantities, vec![("l1".to_string(), 3)]);
        assert_eq!(plan.observed_quantities.get("l1"), Some(&1));
        assert_eq!(plan.observed_quantities.get("l2"), Some(&2));
        assert_eq!(plan.order.total_cents, 750);
    }

    #[test]
    fn selection_limits_consumed_lines() {
        let cart = vec![
            line("l1", "tea", DrinkOptions::default(), 1, 30),
            line("l2", "cafe", DrinkOptions::default(), 1, 10),
        ];
        let ids = vec!["l2".to_string()];
        let request = CheckoutRequest {
            user_id: "u1",
            line_ids: Some(ids.as_slice()),
            expected_total_cents: Some(300),
        };
        let plan = plan_checkout(request, cart, &catalog(), "o1".into(), Utc::now()).unwrap();
        assert_eq!(plan.consumed_line_ids, vec!["l2".to_string()]);
        assert_eq!(plan.order.total_cents, 300);
    }

    #[test]
    fn unknown_line_in_selection_is_not_found() {
        let cart = vec![line("l1", "tea", DrinkOptions::default(), 1, 30)];
        let ids = vec!["l1".to_string(), "nope".to_string()];
        let request = CheckoutRequest {
            user_id: "u1",
            line_ids: Some(ids.as_slice()),
            expected_total_cents: None,
        };
        let err = plan_checkout(request, cart, &catalog(), "o1".into(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn stale_expected_total_conflicts() {
        let cart = vec![line("l1", "tea", DrinkOptions::default(), 2, 30)];
        let request = CheckoutRequest {
            user_id: "u1",
            line_ids: None,
            expected_total_cents: Some(250),
        };
        let err = plan_checkout(request, cart, &catalog(), "o1".into(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn empty_cart_is_rejected() {
        let err = plan_checkout(whole_cart(), vec![], &catalog(), "o1".into(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn retired_product_blocks_checkout() {
        let mut products = catalog();
        if let Some(p) = products.get_mut("tea") {
            p.available = false;
        }
        let cart = vec![line("l1", "tea", DrinkOptions::default(), 1, 30)];
        let err = plan_checkout(whole_cart(), cart, &products, "o1".into(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
