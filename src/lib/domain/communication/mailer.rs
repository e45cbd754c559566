//! Mail transport module

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::templates::ViewData;

mod errors;

pub use errors::MailerError;

/// A fully rendered email, as handed to a [`MailTransport`].
///
/// One message is addressed to every recipient at once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// The recipients of the email
    pub to: Vec<String>,

    /// The sender's email address
    pub from: String,

    /// The display name shown next to the sender's address
    pub from_name: Option<String>,

    /// The subject of the email
    pub subject: String,

    /// The name of the layout view the HTML was rendered from
    pub layout: String,

    /// The rendered HTML
    pub html: String,

    /// The data the layout was rendered with
    pub context: ViewData,
}

/// Delivers emails
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `message` - The [`OutgoingMessage`] to deliver.
    ///
    /// # Returns
    /// A [`Result`] indicating success or failure.
    async fn send(&self, message: &OutgoingMessage) -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub MailTransport {}

    #[async_trait]
    impl MailTransport for MailTransport {
        async fn send(&self, message: &OutgoingMessage) -> Result<(), MailerError>;
    }
}
