//! User management service: application-layer orchestration
//!
//! Registration goes through e-mail verification: `register` sends a code,
//! `verify` exchanges it for a ticket, `complete_onboarding` creates the
//! account. HTTP handlers are thin wrappers around these methods.

use std::sync::Arc;

use tracing::{info, warn};

use super::verification::VerificationService;
use crate::domain::product::NewImage;
use crate::domain::verification::VerificationKind;
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, GetUserDto, RepositoryProvider, User, UserImage,
    UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password_with_cost, verify_password};
use crate::shared::{is_plausible_email, is_valid_username, PaginatedResult};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct OnboardingInput {
    pub ticket: String,
    pub username: String,
    pub name: Option<String>,
    pub password: String,
    pub confirm_password: String,
    pub remember_me: bool,
}

/// User service: orchestrates all identity / user-management use-cases.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    verification: Arc<VerificationService>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        verification: Arc<VerificationService>,
        jwt_config: JwtConfig,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            repos,
            verification,
            jwt_config,
            bcrypt_cost,
        }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by username or e-mail + password and return a JWT.
    pub async fn login(&self, login: &str, password: &str, remember_me: bool) -> DomainResult<AuthResult> {
        let Some(user) = self.repos.users().get_user_by_login(login.trim()).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        self.repos.users().record_login(&user.id).await?;
        info!(user_id = %user.id, username = %user.username, remember_me, "User logged in");

        self.issue_token(user, remember_me)
    }

    // ── Registration ────────────────────────────────────────────

    /// Start sign-up: e-mail a code to `email`. Returns the verify link.
    pub async fn register(&self, email: &str) -> DomainResult<String> {
        let email = email.trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        if self.repos.users().get_user_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        self.verification.start(VerificationKind::Onboarding, &email).await
    }

    /// Check an OTP and return a verification ticket.
    pub async fn verify(&self, kind: VerificationKind, target: &str, code: &str) -> DomainResult<String> {
        let target = target.trim().to_lowercase();
        self.verification.check(kind, &target, code).await
    }

    /// Create the account for a verified e-mail and log it in.
    pub async fn complete_onboarding(&self, input: OnboardingInput) -> DomainResult<AuthResult> {
        let email = self
            .verification
            .redeem_ticket(&input.ticket, VerificationKind::Onboarding)?;

        let username = input.username.trim();
        if !is_valid_username(username) {
            return Err(DomainError::Validation(
                "Username must be 3-50 characters of letters, digits, '_', '-' or '.'".into(),
            ));
        }
        check_new_password(&input.password, &input.confirm_password)?;

        if self.repos.users().get_user_by_username(username).await?.is_some() {
            return Err(DomainError::Conflict("Username already exists".into()));
        }
        if self.repos.users().get_user_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                username: username.to_string(),
                email,
                name: input.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
                role: UserRole::Customer,
                password_hash: self.hash(&input.password)?,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "New user registered");
        self.issue_token(user, input.remember_me)
    }

    // ── Password recovery ───────────────────────────────────────

    /// E-mail a reset code if the account exists. Never reveals whether it does.
    pub async fn forgot_password(&self, login: &str) -> DomainResult<()> {
        let user = match self.repos.users().get_user_by_login(login.trim()).await {
            Ok(Some(user)) if user.is_active => user,
            Ok(_) => {
                info!("Password reset requested for unknown account");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, "Password reset lookup failed");
                return Ok(());
            }
        };

        if let Err(e) = self
            .verification
            .start(VerificationKind::ResetPassword, &user.email)
            .await
        {
            warn!(user_id = %user.id, error = %e, "Failed to send password reset code");
        }
        Ok(())
    }

    pub async fn reset_password(&self, ticket: &str, password: &str, confirm_password: &str) -> DomainResult<()> {
        let email = self
            .verification
            .redeem_ticket(ticket, VerificationKind::ResetPassword)?;
        check_new_password(password, confirm_password)?;

        let user = self
            .repos
            .users()
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("Account no longer exists".into()))?;

        let new_hash = self.hash(password)?;
        self.repos.users().update_user_password(&user.id, &new_hash).await?;

        info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn me(&self, user_id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))
    }

    pub async fn profile(&self, username: &str) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_username(username)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| DomainError::not_found("User", "username", username))
    }

    /// Profile picture of an active user.
    pub async fn profile_image(&self, username: &str) -> DomainResult<UserImage> {
        let user = self.profile(username).await?;
        self.repos
            .users()
            .image(&user.id)
            .await?
            .ok_or_else(|| DomainError::not_found("UserImage", "username", username))
    }

    /// List users with search, filtering, sorting and pagination.
    pub async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        self.repos.users().list_users(dto).await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Change a user's password. Verifies the current password first.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "New password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let user = self.me(user_id).await?;

        let valid = verify_password(current_password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid current password".into()));
        }

        let new_hash = self.hash(new_password)?;
        self.repos.users().update_user_password(user_id, &new_hash).await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    /// Replace the user's profile picture.
    pub async fn update_image(&self, user_id: &str, image: NewImage) -> DomainResult<User> {
        image.validate()?;
        let size = image.data.len();
        let user = self.repos.users().set_image(user_id, image).await?;
        info!(user_id, size, "Profile picture updated");
        Ok(user)
    }

    pub async fn remove_image(&self, user_id: &str) -> DomainResult<()> {
        if !self.repos.users().remove_image(user_id).await? {
            return Err(DomainError::not_found("UserImage", "user_id", user_id));
        }
        info!(user_id, "Profile picture removed");
        Ok(())
    }

    /// Create an admin account when the database has no users. Returns whether one was created.
    pub async fn ensure_default_admin(&self, username: &str, email: &str, password: &str) -> DomainResult<bool> {
        if self.repos.users().count_users().await? > 0 {
            return Ok(false);
        }

        let admin = self
            .repos
            .users()
            .create_user(CreateUserDto {
                username: username.to_string(),
                email: email.to_string(),
                name: None,
                role: UserRole::Admin,
                password_hash: self.hash(password)?,
            })
            .await?;

        info!(user_id = %admin.id, email = %admin.email, "Default admin created");
        warn!("Please change the default admin password immediately");
        Ok(true)
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn hash(&self, password: &str) -> DomainResult<String> {
        hash_password_with_cost(password, self.bcrypt_cost)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))
    }

    fn issue_token(&self, user: User, remember_me: bool) -> DomainResult<AuthResult> {
        let token = create_token(&user.id, &user.username, user.role.as_str(), remember_me, &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        let expires_in = if remember_me {
            self.jwt_config.remember_me_days * 24 * 3600
        } else {
            self.jwt_config.expiration_hours * 3600
        };

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in,
            user,
        })
    }
}

fn check_new_password(password: &str, confirm: &str) -> DomainResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if password != confirm {
        return Err(DomainError::Validation("Passwords do not match".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_password_must_match_confirmation() {
        assert!(check_new_password("longenough", "longenough").is_ok());
        assert!(check_new_password("longenough", "different1").is_err());
        assert!(check_new_password("short", "short").is_err());
    }
}
