//! Transactional e-mail over the Resend HTTP API

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::application::ports::{EmailMessage, MailError, Mailer};
use crate::shared::{retry_with_backoff, RetryConfig};

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

pub struct ResendMailer {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
    retry: RetryConfig,
}

impl ResendMailer {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Result<Self, MailError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| MailError::Config(e.to_string()))?;

        Ok(Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
            from: from.into(),
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn post(&self, message: &EmailMessage) -> Result<(), MailError> {
        let payload = SendEmailRequest {
            from: &self.from,
            to: [message.to.as_str()],
            subject: &message.subject,
            text: &message.text,
            html: message.html.as_deref(),
            reply_to: message.reply_to.as_deref(),
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        retry_with_backoff(
            self.retry.clone(),
            || self.post(&message),
            MailError::is_transient,
            "send_email",
        )
        .await?;

        debug!(to = %message.to, subject = %message.subject, "Email accepted by provider");
        Ok(())
    }
}
