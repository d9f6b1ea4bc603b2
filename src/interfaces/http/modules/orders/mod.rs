//! Orders module: purchase history

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
