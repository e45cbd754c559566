#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Command line interface for templated emails and verification links

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args as ClapArgs, Parser, Subcommand};
use templated_mailer::{
    domain::{
        auth::{MustVerifyEmail, VerificationUrlGenerator},
        communication::{MailService, MailServiceImpl, Recipients, ViewData},
    },
    infrastructure::{
        clock::SystemClock,
        config::{MailConfig, VerificationConfig},
        email::{smtp::SMTPConfig, ConfiguredMailer},
        templates::{MiniJinjaRenderer, TemplateConfig},
        urls::signed::{HmacUrlSigner, SigningConfig},
    },
};
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Args {
    /// The command to run
    #[clap(subcommand)]
    pub command: Command,
}

/// Commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compose a templated email and send it
    Send(SendArgs),

    /// Print a signed email verification link
    VerificationUrl(VerificationUrlArgs),

    /// Check a signed link
    VerifyUrl(VerifyUrlArgs),
}

/// Arguments of the `send` command
#[derive(Debug, ClapArgs)]
pub struct SendArgs {
    /// The subject of the email
    #[clap(long)]
    pub subject: String,

    /// The sender's email address
    #[clap(long)]
    pub from: String,

    /// A recipient's email address, may be repeated
    #[clap(long = "to", required = true)]
    pub to: Vec<String>,

    /// The content view, relative to `emails.`
    #[clap(long)]
    pub body: String,

    /// The layout, resolved to `emails.layouts.<layout>_layout`
    #[clap(long, default_value = "default")]
    pub layout: String,

    /// The data passed to the content view, as a JSON object
    #[clap(long, default_value = "{}")]
    pub data: String,

    /// The mail configuration
    #[clap(flatten)]
    pub mail: MailConfig,

    /// The SMTP configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// The template configuration
    #[clap(flatten)]
    pub templates: TemplateConfig,
}

/// Arguments of the `verification-url` command
#[derive(Debug, ClapArgs)]
pub struct VerificationUrlArgs {
    /// The identifier of the account
    #[clap(long)]
    pub id: String,

    /// The email address being verified
    #[clap(long)]
    pub email: String,

    /// The URL signing configuration
    #[clap(flatten)]
    pub signing: SigningConfig,

    /// The verification configuration
    #[clap(flatten)]
    pub verification: VerificationConfig,
}

/// Arguments of the `verify-url` command
#[derive(Debug, ClapArgs)]
pub struct VerifyUrlArgs {
    /// The signed URL
    pub url: String,

    /// The URL signing configuration
    #[clap(flatten)]
    pub signing: SigningConfig,
}

struct Account<'a> {
    id: &'a str,
    email: &'a str,
}

impl MustVerifyEmail for Account<'_> {
    fn verification_key(&self) -> String {
        self.id.to_string()
    }

    fn email_for_verification(&self) -> &str {
        self.email
    }
}

async fn send(args: SendArgs) -> Result<()> {
    let data: ViewData =
        serde_json::from_str(&args.data).context("--data must be a JSON object")?;
    let recipients = Recipients::new(args.to)?;

    let service = MailServiceImpl::new(
        Arc::new(MiniJinjaRenderer::new(&args.templates)),
        Arc::new(ConfiguredMailer::new(args.mail.mailer, args.smtp)),
        args.mail.into(),
    );

    service
        .send_email(
            &args.subject,
            &args.from,
            recipients,
            &args.body,
            &args.layout,
            &data,
        )
        .await?;

    info!(subject = %args.subject, "email sent");

    Ok(())
}

fn verification_url(args: VerificationUrlArgs) -> Result<()> {
    let generator = VerificationUrlGenerator::new(
        Arc::new(HmacUrlSigner::new(&args.signing)?),
        Arc::new(SystemClock),
        args.verification.expire,
    );

    let url = generator.verification_url(&Account {
        id: &args.id,
        email: &args.email,
    })?;

    println!("{url}");

    Ok(())
}

fn verify_url(args: VerifyUrlArgs) -> Result<()> {
    HmacUrlSigner::new(&args.signing)?.validate(&args.url, Utc::now())?;

    println!("valid");

    Ok(())
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    match Args::parse().command {
        Command::Send(args) => send(args).await,
        Command::VerificationUrl(args) => verification_url(args),
        Command::VerifyUrl(args) => verify_url(args),
    }
}
