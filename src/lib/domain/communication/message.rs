//! Email message payload

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error that can occur when building a recipient list
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecipientsError {
    /// No recipient was given
    #[error("at least one recipient is required")]
    Empty,
}

/// A non-empty, ordered list of recipient email addresses
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Recipients(Vec<String>);

impl Recipients {
    /// Create a recipient list from several addresses
    pub fn new(addresses: Vec<String>) -> Result<Self, RecipientsError> {
        if addresses.is_empty() {
            return Err(RecipientsError::Empty);
        }

        Ok(Self(addresses))
    }
}

impl Deref for Recipients {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for Recipients {
    fn from(address: &str) -> Self {
        Self(vec![address.to_string()])
    }
}

impl From<String> for Recipients {
    fn from(address: String) -> Self {
        Self(vec![address])
    }
}

impl TryFrom<Vec<String>> for Recipients {
    type Error = RecipientsError;

    fn try_from(addresses: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(addresses)
    }
}

impl TryFrom<Vec<&str>> for Recipients {
    type Error = RecipientsError;

    fn try_from(addresses: Vec<&str>) -> Result<Self, Self::Error> {
        Self::new(addresses.into_iter().map(String::from).collect())
    }
}

impl From<Recipients> for Vec<String> {
    fn from(recipients: Recipients) -> Self {
        recipients.0
    }
}

/// A composed email, ready to be dispatched
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessagePayload {
    /// The subject of the email
    pub subject: String,

    /// The sender's email address
    pub sender: String,

    /// The recipients of the email
    pub recipients: Recipients,

    /// The HTML body, rendered and post-processed
    pub body: String,

    /// The name of the layout view the body is wrapped in
    pub layout: String,
}
