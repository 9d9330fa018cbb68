//! Row shapes returned by the backend and their mapping onto entities.

use crate::domain::entities::{Assignment, AssignmentType, ClientRef, Holiday};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

/// Year used for holidays registered without one; a leap year so that
/// 29 February stays representable.
const RECURRING_YEAR: i32 = 2000;

/// An embedded relation comes back as an object or a one-element array
/// depending on how the join is declared.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Embedded<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Embedded<T> {
    pub fn into_first(self) -> Option<T> {
        match self {
            Embedded::One(item) => Some(item),
            Embedded::Many(items) => items.into_iter().next(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentRow {
    pub id: String,
    #[serde(default)]
    pub assignment_type: AssignmentType,
    #[serde(default)]
    pub schedule: Value,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub weekly_hours: Option<f64>,
    #[serde(default)]
    pub users: Option<Embedded<ClientRef>>,
}

impl From<AssignmentRow> for Assignment {
    fn from(row: AssignmentRow) -> Self {
        Assignment {
            id: row.id,
            assignment_type: row.assignment_type,
            schedule: row.schedule,
            start_date: row.start_date,
            end_date: row.end_date,
            weekly_hours: row.weekly_hours,
            client: row.users.and_then(Embedded::into_first),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HolidayRow {
    pub day: u32,
    pub month: u32,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
}

impl HolidayRow {
    /// `None` for rows that do not name a real date.
    pub fn into_holiday(self) -> Option<Holiday> {
        let year = self.year.unwrap_or(RECURRING_YEAR);
        let Some(date) = NaiveDate::from_ymd_opt(year, self.month, self.day) else {
            tracing::debug!(
                "Skipping holiday with invalid date {}-{}-{}",
                year,
                self.month,
                self.day
            );
            return None;
        };
        Some(match self.year {
            Some(_) => Holiday::new(date, self.name),
            None => Holiday::recurring(date, self.name),
        })
    }
}

/// Whether a holiday touches `from..=to`.
pub fn holiday_in_window(holiday: &Holiday, from: NaiveDate, to: NaiveDate) -> bool {
    if !holiday.recurring {
        return holiday.date >= from && holiday.date <= to;
    }
    (from.year()..=to.year()).any(|year| {
        NaiveDate::from_ymd_opt(year, holiday.date.month(), holiday.date.day())
            .map_or(false, |date| date >= from && date <= to)
    })
}
