//! Clock values within a day and the windows built from them.
//!
//! A [`TimeOfDay`] is a minute-resolution wall-clock value with no date. The
//! range runs from `00:00` to `24:00` inclusive; `24:00` marks the end of the
//! day so that a window can close exactly at midnight.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock value with minute resolution, totally ordered within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    /// Build from hour and minute. `24:00` is the only accepted value with hour 24.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self> {
        if minute > 59 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "time out of range: {hour:02}:{minute:02}"
            )));
        }
        Ok(TimeOfDay((hour * 60 + minute) as u16))
    }

    /// Build from minutes since midnight (`0..=1440`).
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes > u32::from(MINUTES_PER_DAY) {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "minute count out of range: {minutes}"
            )));
        }
        Ok(TimeOfDay(minutes as u16))
    }

    /// The clock value of a local datetime. Seconds are truncated.
    pub fn of(instant: NaiveDateTime) -> Self {
        TimeOfDay((instant.hour() * 60 + instant.minute()) as u16)
    }

    /// The clock value of a local datetime, rounded up to the next minute when
    /// it has seconds. `23:59:30` becomes `24:00`.
    pub fn ceil_of(instant: NaiveDateTime) -> Self {
        let floor = Self::of(instant);
        if instant.second() == 0 && instant.nanosecond() == 0 {
            floor
        } else {
            TimeOfDay(floor.0 + 1)
        }
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || ScheduleError::InvalidConfiguration(format!("malformed time: '{s}'"));

        let (h, m) = trimmed.split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        TimeOfDay::from_hm(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// An open (working) or break (unavailable) period for one weekday.
///
/// When `active` is false the times are kept for display but never evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingWindow {
    pub active: bool,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl WorkingWindow {
    /// An active window from `start` to `end`.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            active: true,
            start,
            end,
        }
    }

    /// An inactive window spanning the whole day.
    pub fn inactive() -> Self {
        Self {
            active: false,
            start: TimeOfDay::MIDNIGHT,
            end: TimeOfDay::END_OF_DAY,
        }
    }

    /// Parse an active window from `"HH:MM-HH:MM"` and validate it.
    pub fn parse(s: &str) -> Result<Self> {
        let (start, end) = s.split_once('-').ok_or_else(|| {
            ScheduleError::InvalidConfiguration(format!("malformed window: '{s}'"))
        })?;
        let window = Self::new(start.parse()?, end.parse()?);
        window.validate()?;
        Ok(window)
    }

    /// Same window with the `active` flag cleared.
    pub fn deactivated(self) -> Self {
        Self {
            active: false,
            ..self
        }
    }

    /// An active window must not end before it starts.
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ScheduleError::InvalidConfiguration(format!(
                "window starts after it ends: {}-{}",
                self.start, self.end
            )))
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.active || self.start <= self.end
    }

    /// `start <= point <= end`. Both boundaries are inside the window.
    pub fn contains(&self, point: TimeOfDay) -> bool {
        self.start <= point && point <= self.end
    }

    /// Whether `[query_start, query_end]` shares any non-empty stretch with
    /// the window. Touching at a single boundary is not an overlap.
    pub fn overlaps(&self, query_start: TimeOfDay, query_end: TimeOfDay) -> bool {
        query_start < self.end && query_end > self.start
    }
}

impl fmt::Display for WorkingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.active {
            write!(f, "{}-{}", self.start, self.end)
        } else {
            write!(f, "inactive")
        }
    }
}
