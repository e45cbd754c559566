//! Error types for signed verification links

use thiserror::Error;

/// Errors that can occur when signing a URL for a named route
#[derive(Debug, Error)]
pub enum SignUrlError {
    /// No route is registered under the name
    #[error("route \"{0}\" is not defined")]
    UnknownRoute(String),

    /// The route needs a parameter that was not given
    #[error("missing parameter \"{0}\"")]
    MissingParameter(String),

    /// The link lifetime is not a positive number of minutes, or the expiry is out of range
    #[error("invalid expiry of {0} minutes")]
    InvalidExpiry(i64),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}
