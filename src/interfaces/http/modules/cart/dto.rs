//! Cart DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{CartEntry, CartView};
use crate::domain::{CartLine, DrinkOptions};
use crate::interfaces::http::modules::products::image_url;
use crate::shared::format_price;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddToCartRequest {
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,
    /// Topping, sugar, ice and size; omitted fields take their defaults
    #[serde(flatten)]
    pub options: DrinkOptions,
    /// Defaults to 1
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    /// Anything that is not a positive number is treated as 1
    #[schema(value_type = i64)]
    pub quantity: Value,
}

impl UpdateQuantityRequest {
    pub fn quantity(&self) -> i64 {
        coerce_quantity(&self.quantity)
    }
}

fn coerce_quantity(value: &Value) -> i64 {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.filter(|q| *q >= 1).unwrap_or(1)
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    /// Lines to buy; the whole cart when omitted
    pub line_ids: Option<Vec<String>>,
    /// Total the client displayed; a mismatch means the cart changed
    pub expected_total_cents: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineDto {
    pub id: String,
    pub product_id: String,
    pub options: DrinkOptions,
    pub quantity: i32,
}

impl From<CartLine> for CartLineDto {
    fn from(l: CartLine) -> Self {
        Self {
            id: l.id,
            product_id: l.product_id,
            options: l.options,
            quantity: l.quantity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemDto {
    pub line_id: String,
    pub product_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub options: DrinkOptions,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
    pub line_total: String,
}

impl From<CartEntry> for CartItemDto {
    fn from(entry: CartEntry) -> Self {
        let line_total_cents = entry.line_total_cents;
        let image_url = entry.product.image_id.as_ref().map(|_| image_url(&entry.product.id));
        Self {
            line_id: entry.line.id,
            product_id: entry.product.id,
            name: entry.product.name,
            description: entry.product.description,
            image_url,
            options: entry.line.options,
            quantity: entry.line.quantity,
            unit_price_cents: entry.product.price_cents,
            line_total_cents,
            line_total: format_price(line_total_cents),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartDto {
    pub items: Vec<CartItemDto>,
    pub item_count: usize,
    pub total_quantity: i64,
    pub total_cents: i64,
    pub total: String,
}

impl From<CartView> for CartDto {
    fn from(view: CartView) -> Self {
        let item_count = view.item_count();
        let total = view.total_display();
        Self {
            items: view.entries.into_iter().map(CartItemDto::from).collect(),
            item_count,
            total_quantity: view.total_quantity,
            total_cents: view.total_cents,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quantity_falls_back_to_one() {
        assert_eq!(coerce_quantity(&json!(3)), 3);
        assert_eq!(coerce_quantity(&json!("7")), 7);
        assert_eq!(coerce_quantity(&json!(0)), 1);
        assert_eq!(coerce_quantity(&json!(-4)), 1);
        assert_eq!(coerce_quantity(&json!("two")), 1);
        assert_eq!(coerce_quantity(&json!(null)), 1);
    }

    #[test]
    fn omitted_options_take_defaults() {
        let req: AddToCartRequest =
            serde_json::from_value(json!({"product_id": "p1", "sugar": 50, "size": "big"})).unwrap();
        assert_eq!(req.options.sugar, 50);
        assert_eq!(req.options.size, crate::domain::CupSize::Big);
        assert_eq!(req.options.ice, crate::domain::Ice::General);
        assert_eq!(req.quantity, None);
    }
}
