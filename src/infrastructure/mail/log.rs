use async_trait::async_trait;
use tracing::info;

use crate::application::ports::{EmailMessage, MailError, Mailer};

/// Development mailer: writes every message to the log instead of sending it.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.text,
            "Outgoing email (log transport)"
        );
        Ok(())
    }
}
