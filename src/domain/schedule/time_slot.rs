//! Wall-clock times and the `{start, end}` slots stored in weekly schedules.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid time regex"))
}

/// A time of day with minute precision, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        (hour < 24 && minute < 60).then(|| ClockTime(hour * 60 + minute))
    }

    /// Parse `H:MM` or `HH:MM`. Anything else, including out-of-range
    /// components, is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = time_pattern().captures(raw)?;
        let hour = caps.get(1)?.as_str().parse::<u16>().ok()?;
        let minute = caps.get(2)?.as_str().parse::<u16>().ok()?;
        Self::from_hm(hour, minute)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClockTime::parse(s).ok_or_else(|| format!("Invalid time (expected HH:MM): {}", s))
    }
}

impl From<chrono::NaiveTime> for ClockTime {
    fn from(time: chrono::NaiveTime) -> Self {
        use chrono::Timelike;
        ClockTime((time.hour() * 60 + time.minute()) as u16)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A contiguous service interval within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeSlot {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Validate a raw `start`/`end` pair. Single-digit hours are accepted and
    /// come back zero-padded through `Display`.
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Some(Self {
            start: ClockTime::parse(start)?,
            end: ClockTime::parse(end)?,
        })
    }

    /// Read a slot out of a stored JSON entry. Non-objects and entries whose
    /// `start`/`end` are missing or not strings yield `None`.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let start = value.get("start")?.as_str()?;
        let end = value.get("end")?.as_str()?;
        Self::parse(start, end)
    }

    pub fn start_minutes(&self) -> u16 {
        self.start.minutes()
    }

    pub fn end_minutes(&self) -> u16 {
        self.end.minutes()
    }

    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end.minutes().saturating_sub(self.start.minutes()))
    }

    /// Half-open membership: the start minute is inside, the end minute is not.
    pub fn contains(&self, minute: u16) -> bool {
        minute >= self.start.minutes() && minute < self.end.minutes()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Parse every entry of a stored `timeSlots` array, dropping malformed ones.
pub fn parse_slots(raw: &[serde_json::Value]) -> Vec<TimeSlot> {
    raw.iter()
        .filter_map(|entry| {
            let slot = TimeSlot::from_value(entry);
            if slot.is_none() {
                tracing::debug!("Dropping malformed time slot: {}", entry);
            }
            slot
        })
        .collect()
}
