//! JWT handling
//!
//! Two token kinds share one signing key: login tokens carried as bearer
//! auth, and short-lived verification tickets issued after a correct OTP.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::VerificationKind;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Login token lifetime in hours
    pub expiration_hours: i64,
    /// Login token lifetime when "remember me" is set
    pub remember_me_days: i64,
    /// Verification ticket lifetime
    pub ticket_ttl_minutes: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expiration_hours: 24,
            remember_me_days: 30,
            ticket_ttl_minutes: 15,
            issuer: "cafe-storefront".to_string(),
        }
    }
}

/// Login token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
}

impl TokenClaims {
    pub fn new(user_id: &str, username: &str, role: &str, remember_me: bool, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let ttl = if remember_me {
            Duration::days(config.remember_me_days)
        } else {
            Duration::hours(config.expiration_hours)
        };

        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Create a login token for a user
pub fn create_token(
    user_id: &str,
    username: &str,
    role: &str,
    remember_me: bool,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = TokenClaims::new(user_id, username, role, remember_me, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a login token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}

/// Proof that `sub` passed an OTP check for `purpose`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TicketClaims {
    /// Verified e-mail address
    pub sub: String,
    pub purpose: VerificationKind,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

pub fn create_ticket(
    email: &str,
    purpose: VerificationKind,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = TicketClaims {
        sub: email.to_string(),
        purpose,
        exp: (now + Duration::minutes(config.ticket_ttl_minutes)).timestamp(),
        iat: now.timestamp(),
        iss: config.issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Decode a ticket. Login tokens are rejected since they carry no `purpose`.
pub fn verify_ticket(ticket: &str, config: &JwtConfig) -> Result<TicketClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let data = decode::<TicketClaims>(
        ticket,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}
