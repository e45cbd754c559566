//! Mail transports

use async_trait::async_trait;

use crate::{
    domain::communication::mailer::{MailTransport, MailerError, OutgoingMessage},
    infrastructure::config::MailerKind,
};

pub mod log;
pub mod smtp;

use log::LogMailer;
use smtp::{SMTPConfig, SMTPMailer};

/// The mail transport picked by configuration
#[derive(Debug, Clone)]
pub enum ConfiguredMailer {
    /// Deliver over SMTP
    Smtp(SMTPMailer),

    /// Write emails to the log
    Log(LogMailer),
}

impl ConfiguredMailer {
    /// Create the transport for `kind`
    pub fn new(kind: MailerKind, smtp: SMTPConfig) -> Self {
        match kind {
            MailerKind::Smtp => Self::Smtp(SMTPMailer::new(smtp)),
            MailerKind::Log => Self::Log(LogMailer::new()),
        }
    }
}

#[async_trait]
impl MailTransport for ConfiguredMailer {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), MailerError> {
        match self {
            Self::Smtp(mailer) => mailer.send(message).await,
            Self::Log(mailer) => mailer.send(message).await,
        }
    }
}
