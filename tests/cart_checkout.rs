//! Cart, checkout and order fulfilment against a real SQLite database.

mod common;

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};

use cafe_storefront::domain::cart::merge_duplicates;
use cafe_storefront::domain::order::{plan_checkout, CheckoutRequest};
use cafe_storefront::domain::{CupSize, DomainError, DrinkOptions, OrderStatus, Topping};
use cafe_storefront::infrastructure::database::entities::cart_line;
use common::TestApp;

fn jelly_big() -> DrinkOptions {
    DrinkOptions {
        topping: Topping::BlackJelly,
        size: CupSize::Big,
        ..DrinkOptions::default()
    }
}

/// Insert a default-options line directly, as two racing inserts would.
async fn insert_duplicate(app: &TestApp, user_id: &str, product_id: &str, quantity: i32) -> String {
    let now = Utc::now();
    let id = uuid::Uuid::new_v4().to_string();
    cart_line::ActiveModel {
        id: Set(id.clone()),
        user_id: Set(user_id.to_string()),
        product_id: Set(product_id.to_string()),
        topping: Set("none".to_string()),
        sugar: Set(100),
        ice: Set("general".to_string()),
        size: Set("regular".to_string()),
        quantity: Set(quantity),
        status: Set(cart_line::CartLineStatus::Active),
        order_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&app.db)
    .await
    .unwrap();
    id
}

#[tokio::test]
async fn same_options_grow_one_line() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let tea = app.product("Milk Tea", 450).await;

    let first = app
        .services
        .cart
        .add_item(&alice.user.id, &tea.id, jelly_big(), Some(2))
        .await
        .unwrap();
    let second = app
        .services
        .cart
        .add_item(&alice.user.id, &tea.id, jelly_big(), None)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.quantity, 3);

    let other = app
        .services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), None)
        .await
        .unwrap();
    assert_ne!(other.id, first.id);

    let cart = app.services.cart.view_cart(&alice.user.id).await.unwrap();
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.total_quantity, 4);
    assert_eq!(cart.total_cents, 4 * 450);
}

#[tokio::test]
async fn quantities_are_clamped_and_capped() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let tea = app.product("Milk Tea", 450).await;

    let line = app
        .services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), Some(0))
        .await
        .unwrap();
    assert_eq!(line.quantity, 1);

    let line = app
        .services
        .cart
        .update_quantity(&alice.user.id, &line.id, -4)
        .await
        .unwrap();
    assert_eq!(line.quantity, 1);

    let err = app
        .services
        .cart
        .update_quantity(&alice.user.id, &line.id, 100)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = app
        .services
        .cart
        .add_item(
            &alice.user.id,
            &tea.id,
            DrinkOptions {
                sugar: 120,
                ..DrinkOptions::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn lines_belong_to_their_owner() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let bob = app.sign_up("bob@example.com", "bob").await;
    let tea = app.product("Milk Tea", 450).await;

    let keep = app
        .services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), None)
        .await
        .unwrap();
    let drop = app
        .services
        .cart
        .add_item(&alice.user.id, &tea.id, jelly_big(), None)
        .await
        .unwrap();

    let err = app
        .services
        .cart
        .remove_line(&bob.user.id, &drop.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    app.services
        .cart
        .remove_line(&alice.user.id, &drop.id)
        .await
        .unwrap();

    let cart = app.services.cart.view_cart(&alice.user.id).await.unwrap();
    assert_eq!(cart.item_count(), 1);
    assert_eq!(cart.entries[0].line.id, keep.id);
}

#[tokio::test]
async fn duplicate_lines_merge_when_viewed() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let tea = app.product("Milk Tea", 450).await;

    let line = app
        .services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), Some(2))
        .await
        .unwrap();

    insert_duplicate(&app, &alice.user.id, &tea.id, 3).await;

    let cart = app.services.cart.view_cart(&alice.user.id).await.unwrap();
    assert_eq!(cart.item_count(), 1);
    assert_eq!(cart.entries[0].line.id, line.id);
    assert_eq!(cart.entries[0].line.quantity, 5);

    let stored = app.repos.carts().active_lines(&alice.user.id).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn checkout_snapshots_lines_and_empties_cart() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let tea = app.product("Milk Tea", 450).await;
    let coffee = app.product("Iced Coffee", 300).await;

    app.services
        .cart
        .add_item(&alice.user.id, &tea.id, jelly_big(), Some(2))
        .await
        .unwrap();
    app.services
        .cart
        .add_item(&alice.user.id, &coffee.id, DrinkOptions::default(), None)
        .await
        .unwrap();
    app.mailer.clear();

    let receipt = app
        .services
        .cart
        .checkout(&alice.user.id, None, Some(1200))
        .await
        .unwrap();

    assert_eq!(receipt.order.order.total_cents, 1200);
    assert_eq!(receipt.order.order.status, OrderStatus::Pending);
    assert_eq!(receipt.order.items.len(), 2);
    assert_eq!(receipt.order.username, "alice");
    assert_eq!(receipt.payment_instructions, "Pay at the counter");

    let cart = app.services.cart.view_cart(&alice.user.id).await.unwrap();
    assert_eq!(cart.item_count(), 0);

    let confirmations = app.mailer.messages_to("alice@example.com");
    assert_eq!(confirmations.len(), 1);
    assert!(confirmations[0].text.contains("Pay at the counter"));

    // Price changes later do not rewrite the order.
    app.services
        .catalog
        .update_product(
            &tea.id,
            cafe_storefront::domain::product::ProductChanges {
                price_cents: Some(999),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let history = app.services.orders.history(&alice.user.id).await.unwrap();
    assert_eq!(history.len(), 1);
    let item = history[0]
        .items
        .iter()
        .find(|i| i.product_id == tea.id)
        .unwrap();
    assert_eq!(item.unit_price_cents, 450);
    assert_eq!(item.product_name, "Milk Tea");
    assert_eq!(item.options, jelly_big());
    assert_eq!(history[0].order.total_cents, 1200);
}

#[tokio::test]
async fn checkout_of_selected_lines_keeps_the_rest() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let tea = app.product("Milk Tea", 450).await;
    let coffee = app.product("Iced Coffee", 300).await;

    let tea_line = app
        .services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), None)
        .await
        .unwrap();
    let coffee_line = app
        .services
        .cart
        .add_item(&alice.user.id, &coffee.id, DrinkOptions::default(), None)
        .await
        .unwrap();

    let receipt = app
        .services
        .cart
        .checkout(&alice.user.id, Some(vec![tea_line.id.clone()]), None)
        .await
        .unwrap();
    assert_eq!(receipt.order.line_ids(), vec![tea_line.id]);
    assert_eq!(receipt.order.order.total_cents, 450);

    let cart = app.services.cart.view_cart(&alice.user.id).await.unwrap();
    assert_eq!(cart.item_count(), 1);
    assert_eq!(cart.entries[0].line.id, coffee_line.id);
}

#[tokio::test]
async fn stale_total_or_empty_cart_is_refused() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let tea = app.product("Milk Tea", 450).await;

    let err = app
        .services
        .cart
        .checkout(&alice.user.id, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    app.services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), None)
        .await
        .unwrap();

    let err = app
        .services
        .cart
        .checkout(&alice.user.id, None, Some(400))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let cart = app.services.cart.view_cart(&alice.user.id).await.unwrap();
    assert_eq!(cart.item_count(), 1);
    assert!(app.services.orders.history(&alice.user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn orders_are_private_to_their_buyer() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let bob = app.sign_up("bob@example.com", "bob").await;
    let tea = app.product("Milk Tea", 450).await;

    app.services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), None)
        .await
        .unwrap();
    let receipt = app
        .services
        .cart
        .checkout(&alice.user.id, None, None)
        .await
        .unwrap();
    let order_id = receipt.order.order.id;

    assert!(app
        .services
        .orders
        .order_for_user(&alice.user.id, &order_id)
        .await
        .is_ok());
    let err = app
        .services
        .orders
        .order_for_user(&bob.user.id, &order_id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn fulfilment_moves_forward_and_feeds_dashboard() {
    let app = TestApp::new().await;
    app.create_admin().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let tea = app.product("Milk Tea", 450).await;

    app.services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), Some(2))
        .await
        .unwrap();
    let order_id = app
        .services
        .cart
        .checkout(&alice.user.id, None, None)
        .await
        .unwrap()
        .order
        .order
        .id;

    let dashboard = app.services.orders.dashboard().await.unwrap();
    assert_eq!(dashboard.orders.pending, 1);
    assert_eq!(dashboard.orders.revenue_cents, 0);
    assert_eq!(dashboard.user_count, 2);
    assert_eq!(dashboard.product_count, 1);

    let paid = app
        .services
        .orders
        .update_status(&order_id, OrderStatus::Paid)
        .await
        .unwrap();
    assert_eq!(paid.order.status, OrderStatus::Paid);

    // Same status again is accepted and changes nothing.
    let again = app
        .services
        .orders
        .update_status(&order_id, OrderStatus::Paid)
        .await
        .unwrap();
    assert_eq!(again.order.status, OrderStatus::Paid);

    app.services
        .orders
        .update_status(&order_id, OrderStatus::Shipped)
        .await
        .unwrap();

    let err = app
        .services
        .orders
        .update_status(&order_id, OrderStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));

    let dashboard = app.services.orders.dashboard().await.unwrap();
    assert_eq!(dashboard.orders.shipped, 1);
    assert_eq!(dashboard.orders.pending, 0);
    assert_eq!(dashboard.orders.revenue_cents, 900);

    let shipped = app
        .services
        .orders
        .list_orders(Some(OrderStatus::Shipped), Default::default())
        .await
        .unwrap();
    assert_eq!(shipped.total, 1);
}

#[tokio::test]
async fn retiring_a_product_clears_it_from_carts() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let tea = app.product("Milk Tea", 450).await;
    let coffee = app.product("Iced Coffee", 300).await;

    app.services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), None)
        .await
        .unwrap();
    app.services
        .cart
        .add_item(&alice.user.id, &coffee.id, DrinkOptions::default(), None)
        .await
        .unwrap();

    app.services.catalog.retire_product(&tea.id).await.unwrap();

    let cart = app.services.cart.view_cart(&alice.user.id).await.unwrap();
    assert_eq!(cart.item_count(), 1);
    assert_eq!(cart.entries[0].product.id, coffee.id);

    assert!(matches!(
        app.services.catalog.get_product(&tea.id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        app.services
            .cart
            .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), None)
            .await
            .unwrap_err(),
        DomainError::Validation(_)
    ));
}

#[tokio::test]
async fn adding_past_the_line_cap_is_refused() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let tea = app.product("Milk Tea", 450).await;

    let line = app
        .services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), Some(99))
        .await
        .unwrap();
    assert_eq!(line.quantity, 99);

    let err = app
        .services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), Some(1))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let cart = app.services.cart.view_cart(&alice.user.id).await.unwrap();
    assert_eq!(cart.total_quantity, 99);

    // The stored quantity is still one the user can set.
    let line = app
        .services
        .cart
        .update_quantity(&alice.user.id, &line.id, 99)
        .await
        .unwrap();
    assert_eq!(line.quantity, 99);
}

#[tokio::test]
async fn merging_stops_at_the_line_cap() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let tea = app.product("Milk Tea", 100).await;

    app.services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), Some(60))
        .await
        .unwrap();
    insert_duplicate(&app, &alice.user.id, &tea.id, 50).await;

    let cart = app.services.cart.view_cart(&alice.user.id).await.unwrap();
    let mut quantities: Vec<i32> = cart.entries.iter().map(|e| e.line.quantity).collect();
    quantities.sort();
    assert_eq!(quantities, vec![50, 60]);
    assert_eq!(cart.total_cents, 110 * 100);

    let receipt = app
        .services
        .cart
        .checkout(&alice.user.id, None, Some(110 * 100))
        .await
        .unwrap();
    assert_eq!(receipt.order.items.len(), 2);
    assert!(receipt.order.items.iter().all(|i| i.quantity <= 99));
}

#[tokio::test]
async fn add_between_planning_and_placing_aborts_checkout() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let tea = app.product("Milk Tea", 100).await;

    app.services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), None)
        .await
        .unwrap();

    let cart = app.repos.carts().active_lines(&alice.user.id).await.unwrap();
    let products: HashMap<_, _> = app
        .repos
        .products()
        .find_by_ids(&[tea.id.clone()])
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();
    let plan = plan_checkout(
        CheckoutRequest {
            user_id: &alice.user.id,
            line_ids: None,
            expected_total_cents: None,
        },
        cart,
        &products,
        uuid::Uuid::new_v4().to_string(),
        Utc::now(),
    )
    .unwrap();

    let grown = app
        .services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), Some(2))
        .await
        .unwrap();
    assert_eq!(grown.quantity, 3);

    let err = app.repos.orders().place(&plan).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // Nothing was consumed; the confirmed units are all still in the cart.
    let cart = app.services.cart.view_cart(&alice.user.id).await.unwrap();
    assert_eq!(cart.total_quantity, 3);
    assert!(app.services.orders.history(&alice.user.id).await.unwrap().is_empty());

    let receipt = app
        .services
        .cart
        .checkout(&alice.user.id, None, None)
        .await
        .unwrap();
    assert_eq!(receipt.order.items[0].quantity, 3);
    assert_eq!(receipt.order.order.total_cents, 300);
}

#[tokio::test]
async fn stale_merge_is_rejected_and_retried_on_view() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let tea = app.product("Milk Tea", 100).await;

    app.services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), Some(2))
        .await
        .unwrap();
    insert_duplicate(&app, &alice.user.id, &tea.id, 3).await;

    let lines = app.repos.carts().active_lines(&alice.user.id).await.unwrap();
    let outcome = merge_duplicates(lines);
    assert_eq!(outcome.absorbed.len(), 1);

    // Lands on the oldest line after the merge was computed.
    app.services
        .cart
        .add_item(&alice.user.id, &tea.id, DrinkOptions::default(), Some(4))
        .await
        .unwrap();

    let err = app.repos.carts().apply_merge(&outcome).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(app.repos.carts().active_lines(&alice.user.id).await.unwrap().len(), 2);

    let cart = app.services.cart.view_cart(&alice.user.id).await.unwrap();
    assert_eq!(cart.item_count(), 1);
    assert_eq!(cart.total_quantity, 9);
}

#[tokio::test]
async fn overflowing_totals_are_rejected() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    let gold = app.product("Gold Leaf Latte", i64::MAX / 2).await;

    app.services
        .cart
        .add_item(&alice.user.id, &gold.id, DrinkOptions::default(), Some(3))
        .await
        .unwrap();

    let err = app.services.cart.view_cart(&alice.user.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = app
        .services
        .cart
        .checkout(&alice.user.id, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}
