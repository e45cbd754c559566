//! SMTP mail transport implementation

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::domain::communication::mailer::{MailTransport, MailerError, OutgoingMessage};

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST", default_value = "localhost")]
    pub host: String,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username
    #[clap(long = "smtp-user", env = "SMTP_USER")]
    pub username: Option<String>,

    /// The SMTP password
    #[clap(long = "smtp-password", env = "SMTP_PASSWORD")]
    pub password: Option<String>,

    /// Verify the TLS certificate
    #[clap(long = "smtp-verify-tls", env = "SMTP_VERIFY_TLS", default_value = "true")]
    pub verify_tls: bool,

    /// Enable STARTTLS (TLS upgrade on connection)
    #[clap(long = "smtp-starttls", env = "SMTP_STARTTLS", default_value = "true")]
    pub starttls: bool,
}

/// SMTP mailer
#[derive(Debug, Default, Clone)]
pub struct SMTPMailer {
    config: SMTPConfig,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SMTPConfig) -> Self {
        Self { config }
    }

    /// Create the SMTP transport described by the configuration
    pub fn mailer(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let relay = if self.config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)?
        };

        let relay = match (&self.config.username, &self.config.password) {
            (Some(username), Some(password)) => {
                relay.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => relay,
        };

        Ok(relay
            .port(self.config.port)
            .tls(Tls::Opportunistic(
                TlsParameters::builder(self.config.host.to_string())
                    .dangerous_accept_invalid_certs(!self.config.verify_tls)
                    .build()?,
            ))
            .build())
    }
}

/// Builds the MIME message for an [`OutgoingMessage`], addressed to all of its recipients.
pub fn mime_message(message: &OutgoingMessage) -> Result<Message, MailerError> {
    let sender: Address = message
        .from
        .parse()
        .map_err(|_| MailerError::InvalidSender(message.from.clone()))?;

    let mut builder = Message::builder()
        .from(Mailbox::new(message.from_name.clone(), sender))
        .subject(message.subject.clone())
        .header(ContentType::TEXT_HTML);

    if message.to.is_empty() {
        return Err(MailerError::NoRecipients);
    }

    for recipient in &message.to {
        let mailbox: Mailbox = recipient
            .parse()
            .map_err(|_| MailerError::InvalidRecipient(recipient.clone()))?;

        builder = builder.to(mailbox);
    }

    Ok(builder.body(message.html.clone())?)
}

#[async_trait]
impl MailTransport for SMTPMailer {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), MailerError> {
        let email = mime_message(message)?;

        debug!(host = %self.config.host, recipients = message.to.len(), "sending email over SMTP");

        self.mailer()?.send(email).await?;

        Ok(())
    }
}
