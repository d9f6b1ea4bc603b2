pub mod service;

pub use service::{Dashboard, OrderService};
