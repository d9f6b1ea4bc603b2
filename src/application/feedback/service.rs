use std::sync::Arc;

use tracing::info;

use crate::application::ports::{EmailMessage, Mailer};
use crate::domain::{DomainError, DomainResult};
use crate::shared::is_plausible_email;

pub const MAX_FEEDBACK_LEN: usize = 2000;

/// Forwards customer feedback to the shop inbox.
pub struct FeedbackService {
    mailer: Arc<dyn Mailer>,
    inbox: String,
    shop_name: String,
}

impl FeedbackService {
    pub fn new(mailer: Arc<dyn Mailer>, inbox: impl Into<String>, shop_name: impl Into<String>) -> Self {
        Self {
            mailer,
            inbox: inbox.into(),
            shop_name: shop_name.into(),
        }
    }

    pub async fn submit(&self, name: &str, email: &str, feedback: &str) -> DomainResult<()> {
        let name = name.trim();
        let email = email.trim();
        let feedback = feedback.trim();

        if name.is_empty() {
            return Err(DomainError::Validation("Name is required".into()));
        }
        if !is_plausible_email(email) {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        if feedback.is_empty() {
            return Err(DomainError::Validation("Feedback is required".into()));
        }
        if feedback.chars().count() > MAX_FEEDBACK_LEN {
            return Err(DomainError::Validation(format!(
                "Feedback must be at most {} characters",
                MAX_FEEDBACK_LEN
            )));
        }

        let message = EmailMessage::text(
            self.inbox.clone(),
            format!("[{}] Feedback from {}", self.shop_name, name),
            format!("From: {} <{}>\n\n{}", name, email, feedback),
        )
        .with_reply_to(email);

        self.mailer.send(message).await?;
        info!(from = %email, "Feedback forwarded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MailError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Vec<EmailMessage>>);

    #[async_trait]
    impl Mailer for Capture {
        async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
            self.0.lock().unwrap().push(message);
            Ok(())
        }
    }

    #[tokio::test]
    async fn feedback_is_sent_to_inbox_with_reply_to() {
        let mailer = Arc::new(Capture::default());
        let service = FeedbackService::new(mailer.clone(), "owner@cafe.local", "Cafe");

        service
            .submit("Mai", "mai@example.com", "Loved the brown sugar latte")
            .await
            .unwrap();

        let sent = mailer.0.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "owner@cafe.local");
        assert_eq!(sent[0].reply_to.as_deref(), Some("mai@example.com"));
        assert!(sent[0].text.contains("brown sugar"));
    }

    #[tokio::test]
    async fn oversized_feedback_is_rejected() {
        let mailer = Arc::new(Capture::default());
        let service = FeedbackService::new(mailer.clone(), "owner@cafe.local", "Cafe");
        let long = "a".repeat(MAX_FEEDBACK_LEN + 1);

        let err = service.submit("Mai", "mai@example.com", &long).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(mailer.0.lock().unwrap().is_empty());
    }
}
