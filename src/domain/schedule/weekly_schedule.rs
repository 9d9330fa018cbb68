//! Validated form of the per-assignment `schedule` JSON blob.
//!
//! Stored rows look like:
//!
//! ```json
//! {
//!   "monday":  { "enabled": true, "timeSlots": [{ "start": "9:00", "end": "11:00" }] },
//!   "holiday": { "timeSlots": [{ "start": "10:00", "end": "12:00" }] },
//!   "holiday_config": { "holiday_timeSlots": [] }
//! }
//! ```
//!
//! Older rows keep a bare slot array under a Spanish day name
//! (`"lunes": [{ "start": "09:00", "end": "10:00" }]`); both shapes parse.

use super::time_slot::{parse_slots, TimeSlot};
use crate::domain::errors::ScheduleError;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const HOLIDAY_KEY: &str = "holiday";
const HOLIDAY_CONFIG_KEY: &str = "holiday_config";
const HOLIDAY_CONFIG_SLOTS_KEY: &str = "holiday_timeSlots";
const TIME_SLOTS_KEY: &str = "timeSlots";
const ENABLED_KEY: &str = "enabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKey {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayKey {
    pub const ALL: [DayKey; 7] = [
        DayKey::Sunday,
        DayKey::Monday,
        DayKey::Tuesday,
        DayKey::Wednesday,
        DayKey::Thursday,
        DayKey::Friday,
        DayKey::Saturday,
    ];

    pub fn from_weekday(weekday: Weekday) -> Self {
        Self::ALL[weekday.num_days_from_sunday() as usize]
    }

    /// 0 = Sunday ... 6 = Saturday.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, DayKey::Saturday | DayKey::Sunday)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayKey::Sunday => "sunday",
            DayKey::Monday => "monday",
            DayKey::Tuesday => "tuesday",
            DayKey::Wednesday => "wednesday",
            DayKey::Thursday => "thursday",
            DayKey::Friday => "friday",
            DayKey::Saturday => "saturday",
        }
    }

    /// Spanish display name.
    pub fn display_name(self) -> &'static str {
        match self {
            DayKey::Sunday => "domingo",
            DayKey::Monday => "lunes",
            DayKey::Tuesday => "martes",
            DayKey::Wednesday => "miércoles",
            DayKey::Thursday => "jueves",
            DayKey::Friday => "viernes",
            DayKey::Saturday => "sábado",
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sunday" | "domingo" => Ok(DayKey::Sunday),
            "monday" | "lunes" => Ok(DayKey::Monday),
            "tuesday" | "martes" => Ok(DayKey::Tuesday),
            "wednesday" | "miercoles" | "miércoles" => Ok(DayKey::Wednesday),
            "thursday" | "jueves" => Ok(DayKey::Thursday),
            "friday" | "viernes" => Ok(DayKey::Friday),
            "saturday" | "sabado" | "sábado" => Ok(DayKey::Saturday),
            _ => Err(format!("Invalid day key: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayConfig {
    pub enabled: bool,
    pub time_slots: Vec<TimeSlot>,
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            time_slots: Vec::new(),
        }
    }
}

impl DayConfig {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self {
                enabled: map.get(ENABLED_KEY).and_then(Value::as_bool).unwrap_or(true),
                time_slots: slots_at(map, TIME_SLOTS_KEY),
            },
            Value::Array(raw) => Self {
                enabled: true,
                time_slots: parse_slots(raw),
            },
            other => {
                tracing::debug!("Ignoring day configuration with unexpected shape: {}", other);
                Self::default()
            }
        }
    }

    /// Slots that apply on this day; a disabled day has none.
    pub fn active_slots(&self) -> &[TimeSlot] {
        if self.enabled {
            &self.time_slots
        } else {
            &[]
        }
    }
}

fn slots_at(map: &Map<String, Value>, key: &str) -> Vec<TimeSlot> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|raw| parse_slots(raw))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeeklySchedule {
    pub days: BTreeMap<DayKey, DayConfig>,
    pub holiday: Option<DayConfig>,
    /// `holiday_config.holiday_timeSlots`, present only when the stored array
    /// has at least one entry (valid or not).
    pub holiday_config_slots: Option<Vec<TimeSlot>>,
}

impl WeeklySchedule {
    /// Validate a stored schedule. Accepts the object itself or a JSON string
    /// holding it.
    pub fn parse(value: &Value) -> Result<Self, ScheduleError> {
        match value {
            Value::String(raw) => Self::parse_str(raw),
            Value::Object(map) => Ok(Self::from_map(map)),
            Value::Null => Err(ScheduleError::NotAnObject("null")),
            Value::Bool(_) => Err(ScheduleError::NotAnObject("boolean")),
            Value::Number(_) => Err(ScheduleError::NotAnObject("number")),
            Value::Array(_) => Err(ScheduleError::NotAnObject("array")),
        }
    }

    pub fn parse_str(raw: &str) -> Result<Self, ScheduleError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| ScheduleError::MalformedJson(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(Self::from_map(&map)),
            // A doubly-encoded string is not unwrapped again
            Value::String(_) => Err(ScheduleError::NotAnObject("string")),
            other => Self::parse(&other),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let mut days = BTreeMap::new();
        for (key, value) in map {
            if let Ok(day) = key.parse::<DayKey>() {
                // English keys win over legacy Spanish aliases for the same day
                if key == day.as_str() || !days.contains_key(&day) {
                    days.insert(day, DayConfig::from_value(value));
                }
            }
        }

        let holiday = map.get(HOLIDAY_KEY).map(DayConfig::from_value);
        let holiday_config_slots = map
            .get(HOLIDAY_CONFIG_KEY)
            .and_then(|config| config.get(HOLIDAY_CONFIG_SLOTS_KEY))
            .and_then(Value::as_array)
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_slots(raw));

        Self {
            days,
            holiday,
            holiday_config_slots,
        }
    }

    pub fn day(&self, day: DayKey) -> Option<&DayConfig> {
        self.days.get(&day)
    }

    /// Slots configured for a weekday, empty when the day is missing or disabled.
    pub fn day_slots(&self, day: DayKey) -> Vec<TimeSlot> {
        self.day(day)
            .map(|config| config.active_slots().to_vec())
            .unwrap_or_default()
    }

    /// Holiday slots: `holiday_config.holiday_timeSlots` when that array is
    /// non-empty, otherwise `holiday.timeSlots`.
    pub fn holiday_slots(&self) -> Vec<TimeSlot> {
        if let Some(slots) = &self.holiday_config_slots {
            return slots.clone();
        }
        self.holiday
            .as_ref()
            .map(|config| config.time_slots.clone())
            .unwrap_or_default()
    }
}
