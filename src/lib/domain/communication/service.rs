//! Templated email service

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::communication::{
    errors::SendMailError,
    links::{annotate_links, nl2br},
    mailer::{MailTransport, OutgoingMessage},
    message::{MessagePayload, Recipients},
    templates::{content_view, layout_view, RenderError, TemplateRenderer, ViewData},
};

/// Separates the body of an email from the common signature
const SIGNATURE_SEPARATOR: &str = "<br><br>";

/// Settings shared by every email the service sends
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MailSettings {
    /// The display name shown next to the sender's address
    pub default_email_name: Option<String>,

    /// The view appended to the body of every email, if it exists
    pub common_signature: Option<String>,
}

/// Templated email service
#[async_trait]
pub trait MailService: Send + Sync + 'static {
    /// Composes an email from a content view and a layout view.
    ///
    /// # Arguments
    /// * `subject` - The subject of the email.
    /// * `sender` - The sender's email address.
    /// * `recipients` - The [`Recipients`] of the email.
    /// * `body` - The content view, relative to `emails.`.
    /// * `layout` - The layout, resolved to `emails.layouts.<layout>_layout`.
    /// * `data` - The [`ViewData`] the content view is rendered with.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] containing the [`MessagePayload`]. The body is
    /// empty when either view does not exist.
    fn build_message(
        &self,
        subject: &str,
        sender: &str,
        recipients: Recipients,
        body: &str,
        layout: &str,
        data: &ViewData,
    ) -> Result<MessagePayload, RenderError>;

    /// Renders the payload's layout around its body and hands it to the mail transport.
    async fn dispatch(&self, payload: &MessagePayload) -> Result<(), SendMailError>;

    /// Composes an email and dispatches it.
    ///
    /// Takes the same arguments as [`MailService::build_message`].
    async fn send_email(
        &self,
        subject: &str,
        sender: &str,
        recipients: Recipients,
        body: &str,
        layout: &str,
        data: &ViewData,
    ) -> Result<(), SendMailError>;
}

/// Templated email service implementation
#[derive(Debug, Clone)]
pub struct MailServiceImpl<T, M>
where
    T: TemplateRenderer,
    M: MailTransport,
{
    templates: Arc<T>,
    mailer: Arc<M>,
    settings: MailSettings,
}

impl<T, M> MailServiceImpl<T, M>
where
    T: TemplateRenderer,
    M: MailTransport,
{
    /// Creates a new mail service.
    pub fn new(templates: Arc<T>, mailer: Arc<M>, settings: MailSettings) -> Self {
        Self {
            templates,
            mailer,
            settings,
        }
    }

    fn render_html(&self, view: &str, data: &ViewData) -> Result<String, RenderError> {
        let rendered = self.templates.render(view, data)?;

        Ok(annotate_links(&nl2br(&rendered)))
    }

    fn common_signature(&self) -> Option<&str> {
        self.settings
            .common_signature
            .as_deref()
            .filter(|view| self.templates.exists(view))
    }
}

#[async_trait]
impl<T, M> MailService for MailServiceImpl<T, M>
where
    T: TemplateRenderer,
    M: MailTransport,
{
    fn build_message(
        &self,
        subject: &str,
        sender: &str,
        recipients: Recipients,
        body: &str,
        layout: &str,
        data: &ViewData,
    ) -> Result<MessagePayload, RenderError> {
        let content = content_view(body);
        let layout = layout_view(layout);
        let mut converted = String::new();

        if self.templates.exists(&content) && self.templates.exists(&layout) {
            converted = self.render_html(&content, data)?;

            if let Some(signature) = self.common_signature() {
                converted.push_str(SIGNATURE_SEPARATOR);
                converted.push_str(&self.render_html(signature, &ViewData::new())?);
            }
        } else {
            debug!(content = %content, layout = %layout, "email views not found, body left empty");
        }

        Ok(MessagePayload {
            subject: subject.to_string(),
            sender: sender.to_string(),
            recipients,
            body: converted,
            layout,
        })
    }

    async fn dispatch(&self, payload: &MessagePayload) -> Result<(), SendMailError> {
        let mut context = ViewData::new();
        context.insert("body".to_string(), Value::String(payload.body.clone()));

        let rendered = self.templates.render(&payload.layout, &context)?;
        let html = css_inline::inline(&rendered)?;

        let message = OutgoingMessage {
            to: payload.recipients.to_vec(),
            from: payload.sender.clone(),
            from_name: self.settings.default_email_name.clone(),
            subject: payload.subject.clone(),
            layout: payload.layout.clone(),
            html,
            context,
        };

        debug!(
            recipients = message.to.len(),
            layout = %message.layout,
            "dispatching email"
        );

        self.mailer.send(&message).await?;

        Ok(())
    }

    async fn send_email(
        &self,
        subject: &str,
        sender: &str,
        recipients: Recipients,
        body: &str,
        layout: &str,
        data: &ViewData,
    ) -> Result<(), SendMailError> {
        let payload = self.build_message(subject, sender, recipients, body, layout, data)?;

        self.dispatch(&payload).await
    }
}
