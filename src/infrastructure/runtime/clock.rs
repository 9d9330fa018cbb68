use crate::domain::ports::Clock;
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Wall clock of the configured time zone.
#[derive(Clone)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}
