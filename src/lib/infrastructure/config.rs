//! Mail and verification settings read from the command line or the environment

use clap::{Parser, ValueEnum};

use crate::domain::{auth::DEFAULT_EXPIRE_MINUTES, communication::MailSettings};

/// The transport used to deliver emails
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MailerKind {
    /// Deliver over SMTP
    #[default]
    Smtp,

    /// Write emails to the log
    Log,
}

/// Mail configuration
#[derive(Clone, Debug, Parser)]
pub struct MailConfig {
    /// The transport used to deliver emails
    #[clap(long = "mailer", env = "MAIL_MAILER", value_enum, default_value_t = MailerKind::Smtp)]
    pub mailer: MailerKind,

    /// The display name shown next to the sender's address
    #[clap(long = "from-name", env = "MAIL_FROM_NAME")]
    pub default_email_name: Option<String>,

    /// The view appended to every email, e.g. `emails.signature`
    #[clap(long = "common-signature", env = "MAIL_COMMON_SIGNATURE")]
    pub common_signature: Option<String>,
}

impl From<MailConfig> for MailSettings {
    fn from(config: MailConfig) -> Self {
        MailSettings {
            default_email_name: config.default_email_name,
            common_signature: config.common_signature,
        }
    }
}

/// Email verification configuration
#[derive(Clone, Debug, Parser)]
pub struct VerificationConfig {
    /// Minutes until a verification link expires
    #[clap(
        long = "verification-expire",
        env = "AUTH_VERIFICATION_EXPIRE",
        default_value_t = DEFAULT_EXPIRE_MINUTES,
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    pub expire: i64,
}
