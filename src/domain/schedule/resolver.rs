//! Maps a stored weekly schedule onto the concrete slots of one date.

use super::time_slot::TimeSlot;
use super::weekly_schedule::{DayKey, WeeklySchedule};
use crate::domain::entities::AssignmentType;
use chrono::{Datelike, NaiveDate};
use serde_json::Value;

/// Resolve the slots of `target` from a raw schedule blob.
///
/// `schedule` may be the object itself or a JSON string holding it. Invalid
/// blobs resolve to no slots.
pub fn resolve_slots_for_day(
    schedule: &Value,
    assignment_type: &str,
    target: NaiveDate,
    is_holiday_override: bool,
) -> Vec<TimeSlot> {
    match WeeklySchedule::parse(schedule) {
        Ok(parsed) => resolve_parsed(
            &parsed,
            &AssignmentType::from(assignment_type),
            target,
            is_holiday_override,
        ),
        Err(e) => {
            tracing::debug!("Schedule ignored: {}", e);
            Vec::new()
        }
    }
}

/// Same resolution over an already validated schedule.
pub fn resolve_parsed(
    schedule: &WeeklySchedule,
    assignment_type: &AssignmentType,
    target: NaiveDate,
    is_holiday_override: bool,
) -> Vec<TimeSlot> {
    let day_slots = schedule.day_slots(DayKey::from_weekday(target.weekday()));
    let holiday_slots = schedule.holiday_slots();
    let must_use_holiday = is_holiday_override || assignment_type.is_holiday_only();

    if must_use_holiday && !holiday_slots.is_empty() {
        holiday_slots
    } else if !day_slots.is_empty() {
        day_slots
    } else {
        holiday_slots
    }
}
