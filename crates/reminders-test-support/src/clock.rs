//! Test clock: deterministic `Clock` implementation for tests.

use chrono::{DateTime, TimeZone, Utc};
use reminders_core::clock::Clock;

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// A clock frozen at 2017-12-31T23:59:59Z.
    ///
    /// # Panics
    ///
    /// Never in practice; the literal date is valid.
    #[must_use]
    pub fn new_year_eve() -> Self {
        Self(Utc.with_ymd_and_hms(2017, 12, 31, 23, 59, 59).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
