use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Hours and earnings closed for one worker and month (`monthly_balances`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBalance {
    pub id: String,
    pub worker_id: String,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub worked_hours: f64,
    #[serde(default)]
    pub holiday_hours: f64,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub services_completed: u32,
    #[serde(default)]
    pub clients_served: u32,
    #[serde(default)]
    pub earnings: f64,
}

impl MonthlyBalance {
    pub fn month_ref(&self) -> Option<MonthRef> {
        MonthRef::new(self.year, self.month)
    }

    pub fn trend(&self) -> BalanceTrend {
        BalanceTrend::from_balance(self.balance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceTrend {
    Positive,
    Negative,
    Neutral,
}

impl BalanceTrend {
    pub fn from_balance(balance: f64) -> Self {
        if balance > 0.0 {
            BalanceTrend::Positive
        } else if balance < 0.0 {
            BalanceTrend::Negative
        } else {
            BalanceTrend::Neutral
        }
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        self.next().first_day()?.pred_opt()
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[(self.month as usize).saturating_sub(1) % 12]
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_navigation_wraps_years() {
        let january = MonthRef::new(2026, 1).unwrap();
        assert_eq!(january.previous(), MonthRef::new(2025, 12).unwrap());
        assert_eq!(MonthRef::new(2025, 12).unwrap().next(), january);
        assert!(MonthRef::new(2026, 13).is_none());
        assert!(MonthRef::new(2026, 0).is_none());
    }

    #[test]
    fn test_month_bounds() {
        let february = MonthRef::new(2028, 2).unwrap();
        assert_eq!(february.first_day(), NaiveDate::from_ymd_opt(2028, 2, 1));
        assert_eq!(february.last_day(), NaiveDate::from_ymd_opt(2028, 2, 29));
        assert_eq!(february.to_string(), "Febrero 2028");
    }

    #[test]
    fn test_trend() {
        assert_eq!(BalanceTrend::from_balance(3.5), BalanceTrend::Positive);
        assert_eq!(BalanceTrend::from_balance(-0.5), BalanceTrend::Negative);
        assert_eq!(BalanceTrend::from_balance(0.0), BalanceTrend::Neutral);
    }

    #[test]
    fn test_deserialize_sparse_row() {
        let row: MonthlyBalance = serde_json::from_str(
            r#"{"id":"b1","worker_id":"w1","year":2026,"month":3,"balance":-2.0}"#,
        )
        .unwrap();
        assert_eq!(row.trend(), BalanceTrend::Negative);
        assert_eq!(row.worked_hours, 0.0);
        assert_eq!(row.month_ref(), MonthRef::new(2026, 3));
    }
}
