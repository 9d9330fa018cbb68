//! Expansion of assignments over date windows (upcoming list, week view,
//! planned hours).

use super::aggregator::{slots_for, DayMode};
use super::time_slot::ClockTime;
use super::weekly_schedule::DayKey;
use crate::domain::entities::{Assignment, AssignmentType};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpcomingRange {
    Tomorrow,
    ThisWeek,
    ThisMonth,
}

impl UpcomingRange {
    pub const ALL: [UpcomingRange; 3] = [
        UpcomingRange::Tomorrow,
        UpcomingRange::ThisWeek,
        UpcomingRange::ThisMonth,
    ];

    /// Inclusive window relative to `today`. `None` when the range is empty,
    /// which happens for `ThisMonth` on the last day of a month.
    pub fn window(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let tomorrow = today.succ_opt()?;
        let end = match self {
            UpcomingRange::Tomorrow => tomorrow,
            UpcomingRange::ThisWeek => today + Duration::days(7),
            UpcomingRange::ThisMonth => last_day_of_month(today)?,
        };
        (tomorrow <= end).then_some((tomorrow, end))
    }

    pub fn display_name(self) -> &'static str {
        match self {
            UpcomingRange::Tomorrow => "Mañana",
            UpcomingRange::ThisWeek => "Esta semana",
            UpcomingRange::ThisMonth => "Este mes",
        }
    }
}

impl FromStr for UpcomingRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tomorrow" => Ok(UpcomingRange::Tomorrow),
            "week" | "this_week" => Ok(UpcomingRange::ThisWeek),
            "month" | "this_month" => Ok(UpcomingRange::ThisMonth),
            _ => Err(format!("Invalid range: {} (expected tomorrow, week or month)", s)),
        }
    }
}

pub fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}

/// Monday of the ISO week containing `date`.
pub fn week_start_for(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// One service occurrence on a concrete date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledService {
    pub assignment_id: String,
    pub label: String,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    pub assignment_type: AssignmentType,
}

impl ScheduledService {
    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end.minutes().saturating_sub(self.start.minutes()))
    }
}

fn services_on(
    assignments: &[Assignment],
    date: NaiveDate,
    mode: DayMode,
) -> impl Iterator<Item = ScheduledService> + '_ {
    assignments
        .iter()
        .filter(move |a| a.is_active_on(date) && mode.admits(&a.assignment_type))
        .flat_map(move |a| {
            let label = a.label();
            slots_for(a, date, mode)
                .into_iter()
                .map(move |slot| ScheduledService {
                    assignment_id: a.id.clone(),
                    label: label.clone(),
                    date,
                    start: slot.start,
                    end: slot.end,
                    assignment_type: a.assignment_type.clone(),
                })
        })
}

/// Every occurrence between `from` and `to` inclusive, sorted by date, start
/// time and label.
pub fn expand_range(
    assignments: &[Assignment],
    from: NaiveDate,
    to: NaiveDate,
    day_mode: &dyn Fn(NaiveDate) -> DayMode,
) -> Vec<ScheduledService> {
    let mut services: Vec<ScheduledService> = from
        .iter_days()
        .take_while(|date| *date <= to)
        .flat_map(|date| services_on(assignments, date, day_mode(date)).collect::<Vec<_>>())
        .collect();
    services.sort_by(|a, b| {
        (a.date, a.start, &a.label).cmp(&(b.date, b.start, &b.label))
    });
    services
}

pub fn planned_minutes(
    assignments: &[Assignment],
    from: NaiveDate,
    to: NaiveDate,
    day_mode: &dyn Fn(NaiveDate) -> DayMode,
) -> u32 {
    expand_range(assignments, from, to, day_mode)
        .iter()
        .map(ScheduledService::duration_minutes)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAgenda {
    pub date: NaiveDate,
    pub day: DayKey,
    pub mode: DayMode,
    pub services: Vec<ScheduledService>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekAgenda {
    pub week_start: NaiveDate,
    pub days: Vec<DayAgenda>,
    pub total_minutes: u32,
}

impl WeekAgenda {
    pub fn total_hours(&self) -> f64 {
        (f64::from(self.total_minutes) / 60.0 * 10.0).round() / 10.0
    }
}

pub fn week_agenda(
    assignments: &[Assignment],
    week_start: NaiveDate,
    day_mode: &dyn Fn(NaiveDate) -> DayMode,
) -> WeekAgenda {
    let week_end = week_start + Duration::days(6);
    let services = expand_range(assignments, week_start, week_end, day_mode);
    let total_minutes = services.iter().map(ScheduledService::duration_minutes).sum();

    let days = week_start
        .iter_days()
        .take(7)
        .map(|date| DayAgenda {
            date,
            day: DayKey::from_weekday(date.weekday()),
            mode: day_mode(date),
            services: services.iter().filter(|s| s.date == date).cloned().collect(),
        })
        .collect();

    WeekAgenda {
        week_start,
        days,
        total_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn regular(_: NaiveDate) -> DayMode {
        DayMode::Regular
    }

    fn weekday_assignment(id: &str) -> Assignment {
        Assignment::new(
            id,
            AssignmentType::Laborables,
            json!({
                "monday": {"timeSlots": [{"start": "09:00", "end": "10:00"}]},
                "wednesday": {"timeSlots": [{"start": "16:00", "end": "17:30"}]}
            }),
            date(2026, 1, 1),
        )
    }

    #[test]
    fn test_windows() {
        let today = date(2026, 3, 10);
        assert_eq!(
            UpcomingRange::Tomorrow.window(today),
            Some((date(2026, 3, 11), date(2026, 3, 11)))
        );
        assert_eq!(
            UpcomingRange::ThisWeek.window(today),
            Some((date(2026, 3, 11), date(2026, 3, 17)))
        );
        assert_eq!(
            UpcomingRange::ThisMonth.window(today),
            Some((date(2026, 3, 11), date(2026, 3, 31)))
        );
    }

    #[test]
    fn test_month_window_empty_on_last_day() {
        assert_eq!(UpcomingRange::ThisMonth.window(date(2026, 4, 30)), None);
        assert_eq!(
            UpcomingRange::ThisMonth.window(date(2026, 12, 30)),
            Some((date(2026, 12, 31), date(2026, 12, 31)))
        );
    }

    #[test]
    fn test_range_from_str() {
        assert_eq!("week".parse::<UpcomingRange>().unwrap(), UpcomingRange::ThisWeek);
        assert_eq!("MONTH".parse::<UpcomingRange>().unwrap(), UpcomingRange::ThisMonth);
        assert!("year".parse::<UpcomingRange>().is_err());
    }

    #[test]
    fn test_week_start_is_monday() {
        assert_eq!(week_start_for(date(2026, 3, 4)), date(2026, 3, 2));
        assert_eq!(week_start_for(date(2026, 3, 2)), date(2026, 3, 2));
        assert_eq!(week_start_for(date(2026, 3, 8)), date(2026, 3, 2));
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(date(2028, 2, 3)), Some(date(2028, 2, 29)));
        assert_eq!(last_day_of_month(date(2026, 12, 3)), Some(date(2026, 12, 31)));
    }

    #[test]
    fn test_expand_range_respects_activity_window() {
        let ending = weekday_assignment("ending").with_end_date(date(2026, 3, 3));
        let services = expand_range(&[ending], date(2026, 3, 2), date(2026, 3, 8), &regular);
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].date, date(2026, 3, 2));
    }

    #[test]
    fn test_expand_range_sorted_by_date_then_start() {
        let mut early = weekday_assignment("early");
        early.schedule = json!({"wednesday": {"timeSlots": [{"start": "08:00", "end": "09:00"}]}});
        let services = expand_range(
            &[weekday_assignment("main"), early],
            date(2026, 3, 2),
            date(2026, 3, 8),
            &regular,
        );
        let keys: Vec<(NaiveDate, String)> = services
            .iter()
            .map(|s| (s.date, s.start.to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (date(2026, 3, 2), "09:00".to_string()),
                (date(2026, 3, 4), "08:00".to_string()),
                (date(2026, 3, 4), "16:00".to_string()),
            ]
        );
    }

    #[test]
    fn test_holiday_days_skip_weekday_assignments() {
        let holiday_monday = |d: NaiveDate| {
            if d == date(2026, 3, 2) {
                DayMode::Holiday
            } else {
                DayMode::Regular
            }
        };
        let services = expand_range(
            &[weekday_assignment("main")],
            date(2026, 3, 2),
            date(2026, 3, 4),
            &holiday_monday,
        );
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].date, date(2026, 3, 4));
    }

    #[test]
    fn test_week_agenda_totals() {
        let agenda = week_agenda(&[weekday_assignment("main")], date(2026, 3, 2), &regular);
        assert_eq!(agenda.days.len(), 7);
        assert_eq!(agenda.days[0].day, DayKey::Monday);
        assert_eq!(agenda.days[6].day, DayKey::Sunday);
        assert_eq!(agenda.days[2].services.len(), 1);
        assert_eq!(agenda.total_minutes, 150);
        assert_eq!(agenda.total_hours(), 2.5);
    }

    #[test]
    fn test_planned_minutes_over_month() {
        // March 2026 has five Mondays and four Wednesdays
        let minutes = planned_minutes(
            &[weekday_assignment("main")],
            date(2026, 3, 1),
            date(2026, 3, 31),
            &regular,
        );
        assert_eq!(minutes, 5 * 60 + 4 * 90);
    }
}
