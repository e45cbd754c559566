//! Email verification for accounts

pub mod clock;
pub mod errors;
pub mod verification;

pub use clock::Clock;
pub use errors::SignUrlError;
pub use verification::{
    verification_hash, MustVerifyEmail, UrlSigner, VerificationUrlGenerator,
    DEFAULT_EXPIRE_MINUTES, VERIFICATION_ROUTE,
};
