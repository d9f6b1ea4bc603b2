//! Users module: public profiles and admin listing

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
