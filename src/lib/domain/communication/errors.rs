//! Error types for composing and sending templated emails

use css_inline::InlineError;
use thiserror::Error;
use tracing::debug;

use crate::domain::communication::{mailer::MailerError, templates::RenderError};

/// Errors that can occur when sending a templated email
#[derive(Debug, Error)]
pub enum SendMailError {
    /// A view could not be rendered
    #[error("could not render view: {0}")]
    RenderFailed(String),

    /// Could not send the email
    #[error("could not send email")]
    CouldNotSendEmail,

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

impl From<RenderError> for SendMailError {
    fn from(err: RenderError) -> Self {
        debug!("RenderError -> SendMailError");

        match err {
            RenderError::NotFound(name) => SendMailError::RenderFailed(name),
            RenderError::UnknownError(e) => SendMailError::UnknownError(e),
        }
    }
}

impl From<MailerError> for SendMailError {
    fn from(err: MailerError) -> Self {
        debug!("MailerError -> SendMailError");

        match err {
            MailerError::SendError
            | MailerError::InvalidSender(_)
            | MailerError::InvalidRecipient(_)
            | MailerError::NoRecipients => SendMailError::CouldNotSendEmail,
            MailerError::UnknownError(e) => SendMailError::UnknownError(e),
        }
    }
}

impl From<InlineError> for SendMailError {
    fn from(err: InlineError) -> Self {
        debug!("InlineError -> SendMailError");

        SendMailError::UnknownError(err.into())
    }
}
