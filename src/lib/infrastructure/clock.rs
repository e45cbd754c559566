//! System clock

use chrono::{DateTime, Utc};

use crate::domain::auth::clock::Clock;

/// Reads the current time from the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
