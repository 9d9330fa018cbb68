//! Merges per-assignment slots into the state-ordered list shown for a day.

use super::resolver::resolve_parsed;
use super::time_slot::{ClockTime, TimeSlot};
use super::weekly_schedule::WeeklySchedule;
use crate::domain::entities::{Assignment, AssignmentType};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Whether a date is treated as a holiday by the calling view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayMode {
    Regular,
    Holiday,
}

impl DayMode {
    pub fn is_holiday(self) -> bool {
        self == DayMode::Holiday
    }

    /// Assignment types eligible to appear on a day of this mode.
    pub fn admits(self, assignment_type: &AssignmentType) -> bool {
        match (self, assignment_type) {
            (_, AssignmentType::Flexible) => true,
            (DayMode::Holiday, AssignmentType::Festivos) => true,
            (DayMode::Regular, AssignmentType::Laborables) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Pending,
    InProgress,
    Done,
}

impl ServiceState {
    /// Sort rank: what needs attention now comes first.
    pub fn rank(self) -> u8 {
        match self {
            ServiceState::InProgress => 0,
            ServiceState::Pending => 1,
            ServiceState::Done => 2,
        }
    }

    pub fn for_slot(slot: &TimeSlot, now_minutes: u16) -> Self {
        if slot.contains(now_minutes) {
            ServiceState::InProgress
        } else if now_minutes >= slot.end_minutes() {
            ServiceState::Done
        } else {
            ServiceState::Pending
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceState::Pending => "pending",
            ServiceState::InProgress => "inprogress",
            ServiceState::Done => "done",
        }
    }
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (assignment, slot) pair annotated with its state at `now`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRow {
    pub assignment_id: String,
    pub label: String,
    pub start: ClockTime,
    pub end: ClockTime,
    pub start_minutes: u16,
    pub state: ServiceState,
}

impl ServiceRow {
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.start, self.end)
    }
}

pub fn aggregate_today(
    assignments: &[Assignment],
    now: NaiveDateTime,
    day: DayMode,
) -> Vec<ServiceRow> {
    aggregate_with_labels(assignments, now, day, Assignment::label)
}

/// Resolve every assignment for `now`'s date and sort the rows by state rank,
/// then start time.
pub fn aggregate_with_labels<F>(
    assignments: &[Assignment],
    now: NaiveDateTime,
    day: DayMode,
    label: F,
) -> Vec<ServiceRow>
where
    F: Fn(&Assignment) -> String,
{
    let now_minutes = ClockTime::from(now.time()).minutes();
    let date = now.date();

    let mut rows: Vec<ServiceRow> = assignments
        .iter()
        .flat_map(|assignment| {
            let name = label(assignment);
            slots_for(assignment, date, day)
                .into_iter()
                .map(move |slot| ServiceRow {
                    assignment_id: assignment.id.clone(),
                    label: name.clone(),
                    start: slot.start,
                    end: slot.end,
                    start_minutes: slot.start_minutes(),
                    state: ServiceState::for_slot(&slot, now_minutes),
                })
        })
        .collect();

    rows.sort_by_key(|row| (row.state.rank(), row.start_minutes));
    rows
}

/// Assignments that apply on `date` at all, independent of time of day.
pub fn assignments_for_day(
    assignments: &[Assignment],
    date: NaiveDate,
    day: DayMode,
) -> Vec<&Assignment> {
    assignments
        .iter()
        .filter(|assignment| day.admits(&assignment.assignment_type))
        .filter(|assignment| !slots_for(assignment, date, day).is_empty())
        .collect()
}

/// Resolved slots of one assignment for `date`.
pub fn slots_for(assignment: &Assignment, date: NaiveDate, day: DayMode) -> Vec<TimeSlot> {
    match WeeklySchedule::parse(&assignment.schedule) {
        Ok(schedule) => resolve_parsed(
            &schedule,
            &assignment.assignment_type,
            date,
            day.is_holiday(),
        ),
        Err(e) => {
            tracing::debug!("Assignment {} has an unusable schedule: {}", assignment.id, e);
            Vec::new()
        }
    }
}

/// Counters for the day header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub total_services: usize,
    pub completed_services: usize,
    pub pending_services: usize,
    pub total_hours: f64,
}

impl DaySummary {
    pub fn from_rows(rows: &[ServiceRow], completed: &HashSet<String>) -> Self {
        let assignments: HashSet<&str> = rows.iter().map(|r| r.assignment_id.as_str()).collect();
        let completed_services = assignments
            .iter()
            .filter(|id| completed.contains(**id))
            .count();
        let minutes: u32 = rows.iter().map(|r| r.slot().duration_minutes()).sum();

        Self {
            total_services: assignments.len(),
            completed_services,
            pending_services: assignments.len() - completed_services,
            total_hours: (f64::from(minutes) / 60.0 * 10.0).round() / 10.0,
        }
    }
}
