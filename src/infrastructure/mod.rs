//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod mail;

pub use database::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
pub use mail::{build_mailer, LogMailer, MemoryMailer, ResendMailer};
