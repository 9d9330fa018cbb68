use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A registered public holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: Option<String>,
    /// If true, repeats annually on the same month-day
    pub recurring: bool,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: Option<String>) -> Self {
        Self {
            date,
            name,
            recurring: false,
        }
    }

    pub fn recurring(date: NaiveDate, name: Option<String>) -> Self {
        Self {
            date,
            name,
            recurring: true,
        }
    }

    pub fn falls_on(&self, date: NaiveDate) -> bool {
        if self.recurring {
            self.date.month() == date.month() && self.date.day() == date.day()
        } else {
            self.date == date
        }
    }
}
