use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Verification, VerificationKind};
use crate::domain::DomainResult;

#[async_trait]
pub trait VerificationRepository: Send + Sync {
    /// Create the verification for `(kind, target)`, replacing any previous one.
    async fn replace(
        &self,
        kind: VerificationKind,
        target: &str,
        code_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<Verification>;
    async fn find(&self, kind: VerificationKind, target: &str) -> DomainResult<Option<Verification>>;
    /// Returns the new attempt count.
    async fn record_failed_attempt(&self, id: &str) -> DomainResult<i32>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
    async fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<u64>;
}
