//! Outbound e-mail transports implementing the `Mailer` port

pub mod log;
pub mod memory;
pub mod resend;

use std::sync::Arc;

pub use self::log::LogMailer;
pub use memory::MemoryMailer;
pub use resend::ResendMailer;

use crate::application::ports::{MailError, Mailer};
use crate::config::{EmailConfig, EmailProvider};

/// Build the transport selected in `[email]`.
pub fn build_mailer(config: &EmailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match config.provider {
        EmailProvider::Log => Ok(Arc::new(LogMailer)),
        EmailProvider::Memory => Ok(Arc::new(MemoryMailer::new())),
        EmailProvider::Resend => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| MailError::Config("email.api_key is required for resend".into()))?;
            Ok(Arc::new(ResendMailer::new(
                config.api_url.clone(),
                api_key,
                config.from.clone(),
            )?))
        }
    }
}
