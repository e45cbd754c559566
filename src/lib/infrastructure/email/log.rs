//! Mail transport that writes emails to the log instead of delivering them

use async_trait::async_trait;
use tracing::info;

use crate::domain::communication::mailer::{MailTransport, MailerError, OutgoingMessage};

/// Log mailer, for local development
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

impl LogMailer {
    /// Create a new log mailer
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailTransport for LogMailer {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), MailerError> {
        if message.to.is_empty() {
            return Err(MailerError::NoRecipients);
        }

        info!(
            to = %message.to.join(", "),
            from = %message.from,
            from_name = message.from_name.as_deref().unwrap_or_default(),
            subject = %message.subject,
            layout = %message.layout,
            "email"
        );

        info!("{}", message.html);

        Ok(())
    }
}
