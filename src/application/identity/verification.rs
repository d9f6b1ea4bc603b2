//! OTP verification flow
//!
//! A code is e-mailed to the target address, checked once, and exchanged
//! for a short-lived signed ticket that later steps (onboarding, password
//! reset) present instead of a session cookie.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::application::ports::{EmailMessage, Mailer};
use crate::domain::verification::VerificationKind;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::jwt::{create_ticket, verify_ticket, JwtConfig};
use crate::infrastructure::crypto::otp::{self, OTP_LENGTH};

#[derive(Debug, Clone)]
pub struct VerificationSettings {
    pub code_ttl_seconds: i64,
    pub max_attempts: i32,
    /// Base URL for links in e-mails
    pub public_url: String,
    pub shop_name: String,
}

pub struct VerificationService {
    repos: Arc<dyn RepositoryProvider>,
    mailer: Arc<dyn Mailer>,
    settings: VerificationSettings,
    jwt_config: JwtConfig,
}

impl VerificationService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        mailer: Arc<dyn Mailer>,
        settings: VerificationSettings,
        jwt_config: JwtConfig,
    ) -> Self {
        Self {
            repos,
            mailer,
            settings,
            jwt_config,
        }
    }

    /// Link to the verify page. The code is included only for the e-mailed magic link.
    pub fn verify_url(&self, kind: VerificationKind, target: &str, code: Option<&str>) -> String {
        let base = format!("{}/auth/verify", self.settings.public_url.trim_end_matches('/'));
        let mut params = vec![("type", kind.as_str()), ("target", target)];
        if let Some(code) = code {
            params.push(("code", code));
        }

        match reqwest::Url::parse_with_params(&base, &params) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(error = %e, base = %base, "Invalid public_url, falling back to relative link");
                format!("/auth/verify?type={}&target={}", kind.as_str(), target)
            }
        }
    }

    /// Issue a fresh code for `(kind, target)` and e-mail it.
    ///
    /// Returns the verify link without the code.
    pub async fn start(&self, kind: VerificationKind, target: &str) -> DomainResult<String> {
        let code = otp::generate_code();
        let expires_at = Utc::now() + Duration::seconds(self.settings.code_ttl_seconds);

        self.repos
            .verifications()
            .replace(kind, target, &otp::hash_code(&code), expires_at)
            .await?;

        let link = self.verify_url(kind, target, Some(&code));
        let minutes = self.settings.code_ttl_seconds / 60;
        let (subject, intro) = match kind {
            VerificationKind::Onboarding => (
                format!("Welcome to {}", self.settings.shop_name),
                "Here is your verification code to finish signing up",
            ),
            VerificationKind::ResetPassword => (
                format!("{} password reset", self.settings.shop_name),
                "Here is your code to reset your password",
            ),
        };
        let text = format!(
            "{}: {}\n\nOr open this link: {}\n\nThe code expires in {} minutes.",
            intro, code, link, minutes
        );
        let html = format!(
            "<p>{}:</p><h1>{}</h1><p>Or click <a href=\"{}\">this link</a>.</p><p>The code expires in {} minutes.</p>",
            intro, code, link, minutes
        );

        self.mailer
            .send(EmailMessage::text(target, subject, text).with_html(html))
            .await?;

        metrics::counter!("verification_codes_sent_total", "type" => kind.as_str()).increment(1);
        info!(kind = %kind, target, "Verification code sent");

        Ok(self.verify_url(kind, target, None))
    }

    /// Check a submitted code. On success the verification is consumed and a ticket returned.
    pub async fn check(&self, kind: VerificationKind, target: &str, code: &str) -> DomainResult<String> {
        let code = code.trim();
        if code.len() != OTP_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::Validation(format!(
                "Code must be {} digits",
                OTP_LENGTH
            )));
        }

        let invalid = || DomainError::Validation("Invalid or expired code".to_string());

        let verification = self
            .repos
            .verifications()
            .find(kind, target)
            .await?
            .ok_or_else(invalid)?;

        if verification.is_expired(Utc::now()) {
            self.repos.verifications().delete(&verification.id).await?;
            return Err(invalid());
        }

        if !otp::verify_code(code, &verification.code_hash) {
            let attempts = self
                .repos
                .verifications()
                .record_failed_attempt(&verification.id)
                .await?;
            warn!(kind = %kind, target, attempts, "Wrong verification code");
            if attempts >= self.settings.max_attempts {
                self.repos.verifications().delete(&verification.id).await?;
                return Err(DomainError::Validation(
                    "Too many attempts, request a new code".to_string(),
                ));
            }
            return Err(invalid());
        }

        self.repos.verifications().delete(&verification.id).await?;
        info!(kind = %kind, target, "Verification succeeded");

        create_ticket(target, kind, &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to sign ticket: {}", e)))
    }

    /// Validate a ticket for `expected` and return the verified e-mail.
    pub fn redeem_ticket(&self, ticket: &str, expected: VerificationKind) -> DomainResult<String> {
        let claims = verify_ticket(ticket, &self.jwt_config)
            .map_err(|_| DomainError::Unauthorized("Invalid or expired verification ticket".to_string()))?;

        if claims.purpose != expected {
            return Err(DomainError::Unauthorized(format!(
                "Verification ticket is not valid for {}",
                expected
            )));
        }
        Ok(claims.sub)
    }

    pub fn ticket_ttl_seconds(&self) -> i64 {
        self.jwt_config.ticket_ttl_minutes * 60
    }

    pub async fn purge_expired(&self) -> DomainResult<u64> {
        self.repos.verifications().purge_expired(Utc::now()).await
    }
}
