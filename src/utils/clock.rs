use chrono::{DateTime, Utc};

use super::time::to_millis;

/// Represents an entity responsible for providing dates across application. This allows tests to
/// pin "now" instead of racing the wall clock.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn time(&self) -> DateTime<Utc>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        to_millis(Utc::now())
    }
}
