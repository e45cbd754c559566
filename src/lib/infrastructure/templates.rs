//! File based email views, rendered with MiniJinja

use std::path::PathBuf;

use clap::Parser;
use minijinja::{path_loader, Environment, ErrorKind};

use crate::domain::communication::templates::{RenderError, TemplateRenderer, ViewData};

/// Template configuration
#[derive(Clone, Debug, Parser)]
pub struct TemplateConfig {
    /// The directory views are loaded from
    #[clap(long = "templates-dir", env = "MAIL_TEMPLATES_DIR", default_value = "templates")]
    pub dir: PathBuf,
}

/// Renders views stored as `.html` files.
///
/// The view `emails.layouts.default_layout` is loaded from
/// `<dir>/emails/layouts/default_layout.html`.
#[derive(Debug)]
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Create a renderer for the configured template directory
    pub fn new(config: &TemplateConfig) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(config.dir.clone()));

        Self { env }
    }
}

fn view_path(name: &str) -> String {
    format!("{}.html", name.replace('.', "/"))
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn exists(&self, name: &str) -> bool {
        match self.env.get_template(&view_path(name)) {
            Ok(_) => true,
            Err(err) => err.kind() != ErrorKind::TemplateNotFound,
        }
    }

    fn render(&self, name: &str, data: &ViewData) -> Result<String, RenderError> {
        let template = self.env.get_template(&view_path(name)).map_err(|err| {
            match err.kind() {
                ErrorKind::TemplateNotFound => RenderError::NotFound(name.to_string()),
                _ => RenderError::UnknownError(err.into()),
            }
        })?;

        template
            .render(data)
            .map_err(|err| RenderError::UnknownError(err.into()))
    }
}
