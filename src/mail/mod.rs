//! Transactional email delivery

mod mailgun;

pub use mailgun::MailgunSender;

use crate::error::DeliveryError;
use crate::types::Delivery;
use async_trait::async_trait;

/// Sends one plain-text email
///
/// Sender address and subject line belong to the implementation's
/// configuration; callers only supply the recipient and the body.
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send `body` to `recipient`
    ///
    /// Returns the provider's raw response text and message id.
    async fn send(&self, recipient: &str, body: &str) -> Result<Delivery, DeliveryError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
