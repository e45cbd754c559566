//! Clock

use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::mock;

/// Source of the current time
pub trait Clock: Send + Sync + 'static {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

#[cfg(test)]
mock! {
    pub Clock {}

    impl Clock for Clock {
        fn now(&self) -> DateTime<Utc>;
    }
}
