//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::cart::CartRepository;
use super::order::OrderRepository;
use super::product::ProductRepository;
use super::user::UserRepository;
use super::verification::VerificationRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let lines = repos.carts().active_lines(&user_id).await?;
///     let order = repos.orders().find_by_id(&order_id).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn products(&self) -> &dyn ProductRepository;
    fn carts(&self) -> &dyn CartRepository;
    fn orders(&self) -> &dyn OrderRepository;
    fn verifications(&self) -> &dyn VerificationRepository;
}
