//! Composing and sending templated emails

pub mod errors;
pub mod links;
pub mod mailer;
pub mod message;
pub mod service;
pub mod templates;

pub use errors::SendMailError;
pub use mailer::{MailTransport, MailerError, OutgoingMessage};
pub use message::{MessagePayload, Recipients, RecipientsError};
pub use service::{MailService, MailServiceImpl, MailSettings};
pub use templates::{RenderError, TemplateRenderer, ViewData};
