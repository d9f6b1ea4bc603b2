pub mod service;

pub use service::{CartEntry, CartService, CartView, CheckoutReceipt, ShopInfo};
