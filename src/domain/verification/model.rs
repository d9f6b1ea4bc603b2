//! One-time verification codes

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::errors::DomainError;

/// What a verification proves ownership of an e-mail for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationKind {
    Onboarding,
    ResetPassword,
}

impl VerificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::ResetPassword => "reset-password",
        }
    }
}

impl fmt::Display for VerificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "onboarding" => Ok(Self::Onboarding),
            "reset-password" => Ok(Self::ResetPassword),
            other => Err(DomainError::Validation(format!(
                "Unknown verification type: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Verification {
    pub id: String,
    pub kind: VerificationKind,
    /// E-mail address being verified
    pub target: String,
    /// SHA-256 hex of the code; the code itself is never stored.
    pub code_hash: String,
    pub attempts: i32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Verification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn kind_uses_kebab_case_on_the_wire() {
        assert_eq!(VerificationKind::ResetPassword.as_str(), "reset-password");
        let parsed: VerificationKind = serde_json::from_str("\"reset-password\"").unwrap();
        assert_eq!(parsed, VerificationKind::ResetPassword);
        assert!("reset_password".parse::<VerificationKind>().is_err());
    }

    #[test]
    fn expiry_is_inclusive() {
        let now = Utc::now();
        let v = Verification {
            id: "v1".into(),
            kind: VerificationKind::Onboarding,
            target: "a@b.co".into(),
            code_hash: String::new(),
            attempts: 0,
            expires_at: now,
            created_at: now - Duration::minutes(10),
        };
        assert!(v.is_expired(now));
        assert!(!v.is_expired(now - Duration::seconds(1)));
    }
}
