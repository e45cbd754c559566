//! Email view lookup and rendering

use thiserror::Error;

#[cfg(test)]
use mockall::mock;

/// Data handed to a view when it is rendered
pub type ViewData = serde_json::Map<String, serde_json::Value>;

/// Returns the name of the content view for an email body, e.g. `emails.welcome`.
pub fn content_view(name: &str) -> String {
    format!("emails.{name}")
}

/// Returns the name of the layout view an email is wrapped in, e.g.
/// `emails.layouts.default_layout`.
pub fn layout_view(name: &str) -> String {
    format!("emails.layouts.{name}_layout")
}

/// Errors raised while rendering a view
#[derive(Debug, Error)]
pub enum RenderError {
    /// The view does not exist
    #[error("view \"{0}\" not found")]
    NotFound(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Renders named views
pub trait TemplateRenderer: Send + Sync + 'static {
    /// Checks whether a view with the given name can be rendered.
    fn exists(&self, name: &str) -> bool;

    /// Renders a view.
    ///
    /// # Arguments
    /// * `name` - The dotted name of the view, e.g. `emails.welcome`.
    /// * `data` - The [`ViewData`] made available to the view.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] containing the rendered text,
    /// or an [`Err`] containing a [`RenderError`].
    fn render(&self, name: &str, data: &ViewData) -> Result<String, RenderError>;
}

#[cfg(test)]
mock! {
    pub TemplateRenderer {}

    impl TemplateRenderer for TemplateRenderer {
        fn exists(&self, name: &str) -> bool;
        fn render(&self, name: &str, data: &ViewData) -> Result<String, RenderError>;
    }
}
