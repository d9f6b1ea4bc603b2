//! Authentication module: sign-up with e-mail verification, login, password recovery

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
