use chrono::{NaiveDate, NaiveDateTime};

/// Source of the local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
