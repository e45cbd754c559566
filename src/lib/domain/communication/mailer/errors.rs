//! Mailer errors

use thiserror::Error;

/// Errors a [`MailTransport`](super::MailTransport) can report
#[derive(Debug, Error)]
pub enum MailerError {
    /// The transport refused or failed to deliver the email
    #[error("the transport could not deliver the email")]
    SendError,

    /// The sender address could not be parsed
    #[error("invalid sender address: {0}")]
    InvalidSender(String),

    /// A recipient address could not be parsed
    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),

    /// The message has nobody to go to
    #[error("the email has no recipients")]
    NoRecipients,

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}

impl From<lettre::error::Error> for MailerError {
    fn from(err: lettre::error::Error) -> Self {
        MailerError::UnknownError(err.into())
    }
}

impl From<lettre::transport::smtp::Error> for MailerError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        if err.is_permanent() || err.is_transient() {
            return MailerError::SendError;
        }

        MailerError::UnknownError(err.into())
    }
}
