//! Identity module: accounts, OTP verification & authentication
//!
//! `UserService` orchestrates login, onboarding, password recovery and
//! profile queries; `VerificationService` owns the one-time code flow.

pub mod cleanup;
pub mod service;
pub mod verification;

pub use cleanup::start_verification_cleanup_task;
pub use service::{AuthResult, OnboardingInput, UserService, MIN_PASSWORD_LEN};
pub use verification::{VerificationService, VerificationSettings};
