use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{EmailMessage, MailError, Mailer};
use crate::infrastructure::crypto::otp::OTP_LENGTH;

/// Keeps sent messages in memory. Used by tests and local demos.
#[derive(Debug, Default, Clone)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<EmailMessage> {
        self.outbox.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn messages_to(&self, to: &str) -> Vec<EmailMessage> {
        self.messages()
            .into_iter()
            .filter(|m| m.to.eq_ignore_ascii_case(to))
            .collect()
    }

    /// The one-time code in the most recent message sent to `to`, if any.
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.messages_to(to)
            .iter()
            .rev()
            .find_map(|m| extract_code(&m.text))
    }

    pub fn clear(&self) {
        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.clear();
        }
    }
}

fn extract_code(text: &str) -> Option<String> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|token| token.len() == OTP_LENGTH)
        .map(str::to_string)
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        debug!(to = %message.to, subject = %message.subject, "Captured email");
        self.outbox
            .lock()
            .map_err(|_| MailError::Transport("outbox lock poisoned".into()))?
            .push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn last_code_is_taken_from_newest_message() {
        let mailer = MemoryMailer::new();
        mailer
            .send(EmailMessage::text("a@x.io", "Code", "Your code is 111111"))
            .await
            .unwrap();
        mailer
            .send(EmailMessage::text("a@x.io", "Code", "Your code is 222222. It expires in 10 minutes."))
            .await
            .unwrap();

        assert_eq!(mailer.last_code_for("A@x.io").as_deref(), Some("222222"));
        assert_eq!(mailer.last_code_for("b@x.io"), None);
    }
}
