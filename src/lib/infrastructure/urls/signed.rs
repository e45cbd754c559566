//! Signed, expiring URLs for named routes

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use clap::Parser;
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use url::Url;

use crate::domain::auth::{
    errors::SignUrlError,
    verification::{UrlSigner, VERIFICATION_ROUTE},
};

type HmacSha256 = Hmac<Sha256>;

const EXPIRES: &str = "expires";
const SIGNATURE: &str = "signature";

/// URL signing configuration
#[derive(Clone, Debug, Parser)]
pub struct SigningConfig {
    /// The base URL of the application
    #[clap(long = "app-url", env = "APP_URL")]
    pub base_url: String,

    /// The key URLs are signed with
    #[clap(long = "app-key", env = "APP_KEY", hide_env_values = true)]
    pub key: String,
}

/// Errors that can occur when checking a signed URL
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The URL carries no signature
    #[error("URL is not signed")]
    MissingSignature,

    /// The signature does not match the URL
    #[error("invalid signature")]
    InvalidSignature,

    /// The signature has expired
    #[error("signature has expired")]
    Expired,
}

/// Signs URLs with HMAC-SHA256.
///
/// Route placeholders such as `{id}` are filled from the parameters, the
/// other parameters and the `expires` timestamp go in the query string in key
/// order, and the signature of the resulting URL is appended last.
pub struct HmacUrlSigner {
    base_url: Url,
    key: Vec<u8>,
    routes: HashMap<String, String>,
}

impl HmacUrlSigner {
    /// Create a signer that knows the email verification route
    pub fn new(config: &SigningConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(&config.base_url)?,
            key: config.key.as_bytes().to_vec(),
            routes: HashMap::from([(
                VERIFICATION_ROUTE.to_string(),
                "/email/verify/{id}/{hash}".to_string(),
            )]),
        })
    }

    /// Registers a named route, e.g. `/invites/{token}`
    pub fn with_route(mut self, name: &str, path: &str) -> Self {
        self.routes.insert(name.to_string(), path.to_string());
        self
    }

    /// Checks that `url` was signed with this signer's key and has not expired at `now`.
    pub fn validate(&self, url: &str, now: DateTime<Utc>) -> Result<(), SignatureError> {
        let mut url = Url::parse(url)?;

        let (signatures, query): (Vec<_>, Vec<_>) = url
            .query_pairs()
            .into_owned()
            .partition(|(key, _)| key == SIGNATURE);

        let (_, signature) = signatures
            .into_iter()
            .next()
            .ok_or(SignatureError::MissingSignature)?;

        url.set_query(None);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(&query);
        }

        let expected = self
            .sign(url.as_str())
            .map_err(|_| SignatureError::InvalidSignature)?;

        if !constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
            return Err(SignatureError::InvalidSignature);
        }

        let expires = query
            .iter()
            .find(|(key, _)| key == EXPIRES)
            .map(|(_, value)| value.parse::<i64>())
            .transpose()
            .map_err(|_| SignatureError::InvalidSignature)?;

        match expires {
            Some(expires) if now.timestamp() > expires => Err(SignatureError::Expired),
            _ => Ok(()),
        }
    }

    fn sign(&self, url: &str) -> anyhow::Result<String> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|err| anyhow!("invalid signing key: {err}"))?;
        mac.update(url.as_bytes());

        Ok(format!("{:x}", mac.finalize().into_bytes()))
    }

    fn route_url(
        &self,
        name: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<(Url, BTreeMap<String, String>), SignUrlError> {
        let path = self
            .routes
            .get(name)
            .ok_or_else(|| SignUrlError::UnknownRoute(name.to_string()))?;

        let mut query = parameters.clone();
        let mut url = self.base_url.clone();

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("{} cannot be a base URL", self.base_url))?;
            segments.pop_if_empty();

            for segment in path.split('/').filter(|segment| !segment.is_empty()) {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(key) => {
                        let value = query
                            .remove(key)
                            .ok_or_else(|| SignUrlError::MissingParameter(key.to_string()))?;
                        segments.push(&value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }

        Ok((url, query))
    }
}

impl UrlSigner for HmacUrlSigner {
    fn temporary_signed_route(
        &self,
        name: &str,
        expires_at: DateTime<Utc>,
        parameters: &BTreeMap<String, String>,
    ) -> Result<String, SignUrlError> {
        let (mut url, mut query) = self.route_url(name, parameters)?;

        query.insert(EXPIRES.to_string(), expires_at.timestamp().to_string());
        url.query_pairs_mut().clear().extend_pairs(&query);

        let signature = self.sign(url.as_str())?;
        url.query_pairs_mut().append_pair(SIGNATURE, &signature);

        Ok(url.into())
    }
}

impl fmt::Debug for HmacUrlSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacUrlSigner")
            .field("base_url", &self.base_url.as_str())
            .field("key", &"********")
            .field("routes", &self.routes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use testresult::TestResult;

    use super::*;

    fn signer(base_url: &str, key: &str) -> HmacUrlSigner {
        HmacUrlSigner::new(&SigningConfig {
            base_url: base_url.to_string(),
            key: key.to_string(),
        })
        .unwrap()
    }

    fn parameters(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn expires_at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_704_114_000, 0).unwrap()
    }

    #[test]
    fn test_signed_verification_url_shape() -> TestResult {
        let url = signer("https://example.com", "secret").temporary_signed_route(
            VERIFICATION_ROUTE,
            expires_at(),
            &parameters(&[("id", "42"), ("hash", "abc")]),
        )?;

        let prefix = "https://example.com/email/verify/42/abc?expires=1704114000&signature=";
        assert!(url.starts_with(prefix), "unexpected URL {url}");

        let signature = &url[prefix.len()..];
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));

        Ok(())
    }

    #[test]
    fn test_signed_url_keeps_base_path_and_sorts_query() -> TestResult {
        let url = signer("https://example.com/app/", "secret")
            .with_route("invites.accept", "/invites/{token}")
            .temporary_signed_route(
                "invites.accept",
                expires_at(),
                &parameters(&[("token", "a b"), ("team", "7"), ("ref", "mail")]),
            )?;

        assert!(url.starts_with(
            "https://example.com/app/invites/a%20b?expires=1704114000&ref=mail&team=7&signature="
        ));

        Ok(())
    }

    #[test]
    fn test_signed_url_validates_until_it_expires() -> TestResult {
        let signer = signer("https://example.com", "secret");
        let url = signer.temporary_signed_route(
            VERIFICATION_ROUTE,
            expires_at(),
            &parameters(&[("id", "42"), ("hash", "abc")]),
        )?;

        signer.validate(&url, expires_at() - Duration::minutes(1))?;
        signer.validate(&url, expires_at())?;

        let result = signer.validate(&url, expires_at() + Duration::seconds(1));
        assert!(matches!(result, Err(SignatureError::Expired)));

        Ok(())
    }

    #[test]
    fn test_tampered_url_is_rejected() -> TestResult {
        let signer = signer("https://example.com", "secret");
        let url = signer.temporary_signed_route(
            VERIFICATION_ROUTE,
            expires_at(),
            &parameters(&[("id", "42"), ("hash", "abc")]),
        )?;

        let tampered = url.replace("/42/", "/43/");
        let result = signer.validate(&tampered, expires_at() - Duration::minutes(1));
        assert!(matches!(result, Err(SignatureError::InvalidSignature)));

        let extended = url.replace("expires=1704114000", "expires=1804114000");
        let result = signer.validate(&extended, expires_at() + Duration::minutes(1));
        assert!(matches!(result, Err(SignatureError::InvalidSignature)));

        Ok(())
    }

    #[test]
    fn test_url_signed_with_another_key_is_rejected() -> TestResult {
        let url = signer("https://example.com", "secret").temporary_signed_route(
            VERIFICATION_ROUTE,
            expires_at(),
            &parameters(&[("id", "42"), ("hash", "abc")]),
        )?;

        let result = signer("https://example.com", "other secret")
            .validate(&url, expires_at() - Duration::minutes(1));

        assert!(matches!(result, Err(SignatureError::InvalidSignature)));

        Ok(())
    }

    #[test]
    fn test_unsigned_url_is_rejected() {
        let result = signer("https://example.com", "secret").validate(
            "https://example.com/email/verify/42/abc?expires=1704114000",
            expires_at(),
        );

        assert!(matches!(result, Err(SignatureError::MissingSignature)));
    }

    #[test]
    fn test_unknown_route() {
        let result = signer("https://example.com", "secret").temporary_signed_route(
            "password.reset",
            expires_at(),
            &BTreeMap::new(),
        );

        assert!(matches!(result, Err(SignUrlError::UnknownRoute(name)) if name == "password.reset"));
    }

    #[test]
    fn test_missing_route_parameter() {
        let result = signer("https://example.com", "secret").temporary_signed_route(
            VERIFICATION_ROUTE,
            expires_at(),
            &parameters(&[("id", "42")]),
        );

        assert!(matches!(result, Err(SignUrlError::MissingParameter(key)) if key == "hash"));
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", signer("https://example.com", "secret"));

        assert!(!debug.contains("secret"));
    }
}
