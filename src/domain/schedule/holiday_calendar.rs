//! The single holiday rule consulted by every view.

use super::aggregator::DayMode;
use crate::domain::entities::Holiday;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which dates count as holidays for schedule resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayPolicy {
    /// Only dates in the registered holiday table
    Registered,
    /// Registered dates plus every Saturday and Sunday
    #[default]
    RegisteredOrWeekend,
    RegisteredOrSunday,
}

impl HolidayPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            HolidayPolicy::Registered => "registered",
            HolidayPolicy::RegisteredOrWeekend => "registered_or_weekend",
            HolidayPolicy::RegisteredOrSunday => "registered_or_sunday",
        }
    }
}

impl fmt::Display for HolidayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HolidayPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "registered" => Ok(HolidayPolicy::Registered),
            "registered_or_weekend" | "weekend" => Ok(HolidayPolicy::RegisteredOrWeekend),
            "registered_or_sunday" | "sunday" => Ok(HolidayPolicy::RegisteredOrSunday),
            other => Err(format!("Invalid holiday policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    holidays: Vec<Holiday>,
    policy: HolidayPolicy,
}

impl HolidayCalendar {
    pub fn new(holidays: Vec<Holiday>, policy: HolidayPolicy) -> Self {
        Self { holidays, policy }
    }

    pub fn policy(&self) -> HolidayPolicy {
        self.policy
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    pub fn registered(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.falls_on(date))
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        if self.registered(date).is_some() {
            return true;
        }
        match self.policy {
            HolidayPolicy::Registered => false,
            HolidayPolicy::RegisteredOrWeekend => {
                matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
            }
            HolidayPolicy::RegisteredOrSunday => date.weekday() == Weekday::Sun,
        }
    }

    pub fn day_mode(&self, date: NaiveDate) -> DayMode {
        if self.is_holiday(date) {
            DayMode::Holiday
        } else {
            DayMode::Regular
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_registered_policy_ignores_weekends() {
        let calendar = HolidayCalendar::new(
            vec![Holiday::new(date(2026, 3, 19), Some("San José".to_string()))],
            HolidayPolicy::Registered,
        );
        assert!(calendar.is_holiday(date(2026, 3, 19)));
        assert!(!calendar.is_holiday(date(2026, 3, 7)));
        assert!(!calendar.is_holiday(date(2026, 3, 8)));
        assert_eq!(calendar.day_mode(date(2026, 3, 19)), DayMode::Holiday);
    }

    #[test]
    fn test_weekend_policies() {
        let weekend = HolidayCalendar::new(Vec::new(), HolidayPolicy::RegisteredOrWeekend);
        assert!(weekend.is_holiday(date(2026, 3, 7)));
        assert!(weekend.is_holiday(date(2026, 3, 8)));
        assert!(!weekend.is_holiday(date(2026, 3, 9)));

        let sunday = HolidayCalendar::new(Vec::new(), HolidayPolicy::RegisteredOrSunday);
        assert!(!sunday.is_holiday(date(2026, 3, 7)));
        assert!(sunday.is_holiday(date(2026, 3, 8)));
    }

    #[test]
    fn test_recurring_holiday_matches_every_year() {
        let calendar = HolidayCalendar::new(
            vec![Holiday::recurring(date(2000, 12, 25), None)],
            HolidayPolicy::Registered,
        );
        assert!(calendar.is_holiday(date(2026, 12, 25)));
        assert!(calendar.is_holiday(date(2031, 12, 25)));
        assert!(!calendar.is_holiday(date(2026, 12, 24)));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("registered".parse::<HolidayPolicy>().unwrap(), HolidayPolicy::Registered);
        assert_eq!(
            "Registered-Or-Weekend".parse::<HolidayPolicy>().unwrap(),
            HolidayPolicy::RegisteredOrWeekend
        );
        assert_eq!("sunday".parse::<HolidayPolicy>().unwrap(), HolidayPolicy::RegisteredOrSunday);
        assert!("never".parse::<HolidayPolicy>().is_err());
    }

    #[test]
    fn test_default_policy_treats_weekends_as_holidays() {
        let calendar = HolidayCalendar::new(Vec::new(), HolidayPolicy::default());
        assert_eq!(calendar.policy(), HolidayPolicy::RegisteredOrWeekend);
        assert_eq!(calendar.day_mode(date(2026, 3, 7)), DayMode::Holiday);
        assert_eq!(calendar.day_mode(date(2026, 3, 8)), DayMode::Holiday);
        assert_eq!(calendar.day_mode(date(2026, 3, 9)), DayMode::Regular);
    }
}
