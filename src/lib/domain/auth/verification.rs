//! Email verification links

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use sha1::{Digest, Sha1};
use tracing::debug;

#[cfg(test)]
use mockall::mock;

use crate::domain::auth::{clock::Clock, errors::SignUrlError};

/// The named route email verification links point to
pub const VERIFICATION_ROUTE: &str = "verification.verify";

/// Minutes a verification link stays valid unless configured otherwise
pub const DEFAULT_EXPIRE_MINUTES: i64 = 60;

/// Something whose email address has to be verified
pub trait MustVerifyEmail {
    /// The unique identifier put in the link
    fn verification_key(&self) -> String;

    /// The email address being verified
    fn email_for_verification(&self) -> &str;
}

/// Builds signed URLs for named routes
pub trait UrlSigner: Send + Sync + 'static {
    /// Creates a signed URL for a named route that stops being valid at `expires_at`.
    ///
    /// # Arguments
    /// * `name` - The name of the route.
    /// * `expires_at` - When the signature expires.
    /// * `parameters` - The route parameters, by name.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] containing the absolute signed URL,
    /// or an [`Err`] containing a [`SignUrlError`].
    fn temporary_signed_route(
        &self,
        name: &str,
        expires_at: DateTime<Utc>,
        parameters: &BTreeMap<String, String>,
    ) -> Result<String, SignUrlError>;
}

#[cfg(test)]
mock! {
    pub UrlSigner {}

    impl UrlSigner for UrlSigner {
        fn temporary_signed_route(
            &self,
            name: &str,
            expires_at: DateTime<Utc>,
            parameters: &BTreeMap<String, String>,
        ) -> Result<String, SignUrlError>;
    }
}

/// Returns the SHA-1 hex digest put in verification links for an email address.
pub fn verification_hash(email: &str) -> String {
    format!("{:x}", Sha1::digest(email.as_bytes()))
}

/// Generates signed, expiring email verification links
#[derive(Debug, Clone)]
pub struct VerificationUrlGenerator<S, C>
where
    S: UrlSigner,
    C: Clock,
{
    signer: Arc<S>,
    clock: Arc<C>,
    expire_minutes: i64,
}

impl<S, C> VerificationUrlGenerator<S, C>
where
    S: UrlSigner,
    C: Clock,
{
    /// Creates a new generator whose links expire after `expire_minutes`.
    pub fn new(signer: Arc<S>, clock: Arc<C>, expire_minutes: i64) -> Self {
        Self {
            signer,
            clock,
            expire_minutes,
        }
    }

    /// Returns the signed verification URL for `notifiable`.
    pub fn verification_url(
        &self,
        notifiable: &impl MustVerifyEmail,
    ) -> Result<String, SignUrlError> {
        let expires_at = Duration::try_minutes(self.expire_minutes)
            .filter(|lifetime| *lifetime > Duration::zero())
            .and_then(|lifetime| self.clock.now().checked_add_signed(lifetime))
            .ok_or(SignUrlError::InvalidExpiry(self.expire_minutes))?;

        let parameters = BTreeMap::from([
            ("id".to_string(), notifiable.verification_key()),
            (
                "hash".to_string(),
                verification_hash(notifiable.email_for_verification()),
            ),
        ]);

        debug!(%expires_at, "generating email verification link");

        self.signer
            .temporary_signed_route(VERIFICATION_ROUTE, expires_at, &parameters)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use testresult::TestResult;

    use crate::domain::auth::clock::MockClock;

    use super::*;

    struct Member {
        id: u64,
        email: String,
    }

    impl MustVerifyEmail for Member {
        fn verification_key(&self) -> String {
            self.id.to_string()
        }

        fn email_for_verification(&self) -> &str {
            &self.email
        }
    }

    fn member() -> Member {
        Member {
            id: 42,
            email: "email@example.com".to_string(),
        }
    }

    fn fixed_clock(now: DateTime<Utc>) -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_now().returning(move || now);
        clock
    }

    #[test]
    fn test_verification_hash_is_sha1_hex() {
        assert_eq!(
            verification_hash("abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            verification_hash(""),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn test_verification_url_signs_route_with_expiry_and_parameters() -> TestResult {
        let now = DateTime::from_timestamp(1_704_110_400, 0).unwrap();
        let expected_hash = verification_hash("email@example.com");

        let mut signer = MockUrlSigner::new();

        signer
            .expect_temporary_signed_route()
            .times(1)
            .withf(move |name, expires_at, parameters| {
                name == VERIFICATION_ROUTE
                    && *expires_at == now + Duration::minutes(60)
                    && parameters.get("id").map(String::as_str) == Some("42")
                    && parameters.get("hash") == Some(&expected_hash)
                    && parameters.len() == 2
            })
            .returning(|_, _, _| Ok("https://example.com/email/verify/42/hash".to_string()));

        let generator = VerificationUrlGenerator::new(
            Arc::new(signer),
            Arc::new(fixed_clock(now)),
            DEFAULT_EXPIRE_MINUTES,
        );

        let url = generator.verification_url(&member())?;

        assert_eq!(url, "https://example.com/email/verify/42/hash");

        Ok(())
    }

    #[test]
    fn test_verification_url_uses_configured_expiry() -> TestResult {
        let now = DateTime::from_timestamp(1_704_110_400, 0).unwrap();

        let mut signer = MockUrlSigner::new();

        signer
            .expect_temporary_signed_route()
            .times(1)
            .withf(move |_, expires_at, _| *expires_at == now + Duration::minutes(15))
            .returning(|_, _, _| Ok("https://example.com/signed".to_string()));

        let generator =
            VerificationUrlGenerator::new(Arc::new(signer), Arc::new(fixed_clock(now)), 15);

        generator.verification_url(&member())?;

        Ok(())
    }

    #[test]
    fn test_verification_url_rejects_out_of_range_expiry() {
        for expire_minutes in [0, -5, 1_000_000_000_000_000, i64::MAX] {
            let mut signer = MockUrlSigner::new();
            signer.expect_temporary_signed_route().times(0);

            let generator = VerificationUrlGenerator::new(
                Arc::new(signer),
                Arc::new(fixed_clock(Utc::now())),
                expire_minutes,
            );

            let result = generator.verification_url(&member());

            assert!(
                matches!(result, Err(SignUrlError::InvalidExpiry(minutes)) if minutes == expire_minutes),
                "expiry of {expire_minutes} minutes was accepted"
            );
        }
    }

    #[test]
    fn test_verification_url_signing_failure() {
        let mut signer = MockUrlSigner::new();

        signer
            .expect_temporary_signed_route()
            .times(1)
            .returning(|_, _, _| Err(SignUrlError::UnknownError(anyhow!("bad key"))));

        let generator = VerificationUrlGenerator::new(
            Arc::new(signer),
            Arc::new(fixed_clock(Utc::now())),
            DEFAULT_EXPIRE_MINUTES,
        );

        let result = generator.verification_url(&member());

        assert!(matches!(result, Err(SignUrlError::UnknownError(_))));
    }
}
