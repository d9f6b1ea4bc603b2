//! Outbound ports: interfaces for talking to the outside world
//!
//! [`Mailer`] decouples the application services from the concrete e-mail
//! transport. Implementations live in `infrastructure::mail`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
    pub reply_to: Option<String>,
}

impl EmailMessage {
    pub fn text(to: impl Into<String>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
            html: None,
            reply_to: None,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail transport failed: {0}")]
    Transport(String),

    #[error("Mail provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Mailer misconfigured: {0}")]
    Config(String),
}

impl MailError {
    /// Network failures and 5xx/429 answers are worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            MailError::Transport(_) => true,
            MailError::Rejected { status, .. } => *status >= 500 || *status == 429,
            MailError::Config(_) => false,
        }
    }
}

impl From<MailError> for DomainError {
    fn from(e: MailError) -> Self {
        DomainError::Unavailable(e.to_string())
    }
}

/// Port for delivering transactional e-mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_server_side_failures_are_transient() {
        assert!(MailError::Transport("timeout".into()).is_transient());
        assert!(MailError::Rejected { status: 503, body: String::new() }.is_transient());
        assert!(MailError::Rejected { status: 429, body: String::new() }.is_transient());
        assert!(!MailError::Rejected { status: 422, body: String::new() }.is_transient());
        assert!(!MailError::Config("no key".into()).is_transient());
    }
}
