//! Admin module: dashboard, order fulfilment and menu management

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
