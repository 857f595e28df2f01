//! Mailgun messages API

use super::MailSender;
use crate::config::MailConfig;
use crate::error::DeliveryError;
use crate::types::Delivery;
use async_trait::async_trait;
use serde::Deserialize;

/// Body of a successful `POST /v3/{domain}/messages`
#[derive(Deserialize)]
struct SendResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    message: String,
}

/// [`MailSender`] using the Mailgun HTTP API
#[derive(Clone)]
pub struct MailgunSender {
    http: reqwest::Client,
    messages_url: String,
    api_key: String,
    sender: String,
    subject: String,
}

impl std::fmt::Debug for MailgunSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunSender")
            .field("messages_url", &self.messages_url)
            .field("sender", &self.sender)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

impl MailgunSender {
    /// Create a sender for the configured domain
    pub fn new(http: reqwest::Client, config: &MailConfig) -> Self {
        let messages_url = format!(
            "{}/v3/{}/messages",
            config.api_base.trim_end_matches('/'),
            urlencoding::encode(&config.domain)
        );
        Self {
            http,
            messages_url,
            api_key: config.api_key.clone(),
            sender: config.sender.clone(),
            subject: config.subject.clone(),
        }
    }
}

#[async_trait]
impl MailSender for MailgunSender {
    #[tracing::instrument(skip(self, body))]
    async fn send(&self, recipient: &str, body: &str) -> Result<Delivery, DeliveryError> {
        let form = [
            ("from", self.sender.as_str()),
            ("to", recipient),
            ("subject", self.subject.as_str()),
            ("text", body),
        ];

        let response = self
            .http
            .post(&self.messages_url)
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DeliveryError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: SendResponse = serde_json::from_str(&text)
            .map_err(|e| DeliveryError::InvalidResponse(format!("{e}: {text}")))?;

        Ok(Delivery {
            response: parsed.message,
            message_id: parsed.id,
        })
    }

    fn name(&self) -> &'static str {
        "mailgun"
    }
}
