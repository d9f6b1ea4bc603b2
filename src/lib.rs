//! # Cafe storefront
//!
//! Online menu, cart and order management for a drinks shop.
//!
//! ## Architecture
//!
//! - **domain**: entities, invariants and repository traits (cart merging,
//!   checkout planning, order status machine)
//! - **application**: use-case services and the outbound `Mailer` port
//! - **infrastructure**: SeaORM persistence, crypto, e-mail transports
//! - **interfaces**: axum REST API with Swagger documentation
//! - **shared**: errors, pagination, formatting, retry, shutdown
//! - **server**: process bootstrap and lifecycle

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::create_api_router;
