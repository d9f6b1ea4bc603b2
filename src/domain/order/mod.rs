//! Order aggregate
//!
//! Orders, checkout planning and the status lifecycle.

pub mod checkout;
pub mod model;
pub mod repository;

pub use checkout::{plan_checkout, CheckoutPlan, CheckoutRequest};
pub use model::{Order, OrderDetails, OrderItem, OrderStats, OrderStatus};
pub use repository::OrderRepository;
