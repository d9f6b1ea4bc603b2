//! Cart line repository interface

use async_trait::async_trait;

use super::merge::MergeOutcome;
use super::model::{CartLine, OptionFingerprint};
use crate::domain::DomainResult;

#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Active lines of a user, oldest first.
    async fn active_lines(&self, user_id: &str) -> DomainResult<Vec<CartLine>>;

    /// Increase the line matching the fingerprint, or create it. Fails with a
    /// validation error if the line would exceed `MAX_LINE_QUANTITY`.
    async fn add_or_increment(
        &self,
        user_id: &str,
        fingerprint: &OptionFingerprint,
        quantity: i32,
    ) -> DomainResult<CartLine>;
    async fn set_quantity(&self, user_id: &str, line_id: &str, quantity: i32) -> DomainResult<CartLine>;
    /// Delete one active line. Returns `false` if nothing matched.
    async fn delete_line(&self, user_id: &str, line_id: &str) -> DomainResult<bool>;
    /// Apply the result of a merge: new quantities and absorbed lines.
    /// Conflict if any involved line changed after it was read.
    async fn apply_merge(&self, outcome: &MergeOutcome) -> DomainResult<()>;
}
