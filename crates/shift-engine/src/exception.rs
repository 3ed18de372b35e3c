//! Date-specific overrides of the weekly template.
//!
//! At most one exception exists per `(owner, date)`; a later write replaces the
//! earlier one. A worker's own entry takes precedence over the facility's.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::owner::Owner;

/// What an exception does to its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionKind {
    /// Forced closed, whatever the template says (holidays, leave).
    Closed,
    /// Forced open with the weekday's template hours.
    Open,
}

impl FromStr for ExceptionKind {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "closed" => Ok(ExceptionKind::Closed),
            "open" => Ok(ExceptionKind::Open),
            other => Err(ScheduleError::InvalidConfiguration(format!(
                "unknown exception kind: '{other}' (expected 'closed' or 'open')"
            ))),
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExceptionKind::Closed => write!(f, "closed"),
            ExceptionKind::Open => write!(f, "open"),
        }
    }
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| ScheduleError::InvalidDate(format!("'{s}': {e}")))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionCalendar {
    entries: BTreeMap<(Owner, NaiveDate), ExceptionKind>,
}

impl ExceptionCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry stored for exactly this owner and date.
    pub fn get_exception(&self, owner: Owner, date: NaiveDate) -> Option<ExceptionKind> {
        self.entries.get(&(owner.canonical(), date)).copied()
    }

    /// The exception in effect for `owner` on `date`: the owner's own entry,
    /// otherwise the facility's.
    pub fn resolve_exception(&self, owner: Owner, date: NaiveDate) -> Option<ExceptionKind> {
        self.get_exception(owner, date)
            .or_else(|| self.get_exception(Owner::Facility, date))
    }

    /// Upsert. Returns the kind that was replaced, if any.
    pub fn set_exception(
        &mut self,
        owner: Owner,
        kind: ExceptionKind,
        date: NaiveDate,
    ) -> Option<ExceptionKind> {
        self.entries.insert((owner.canonical(), date), kind)
    }

    /// Returns the kind that was removed, if any.
    pub fn clear_exception(&mut self, owner: Owner, date: NaiveDate) -> Option<ExceptionKind> {
        self.entries.remove(&(owner.canonical(), date))
    }

    /// An owner's exceptions in date order.
    pub fn exceptions_for(&self, owner: Owner) -> Vec<(NaiveDate, ExceptionKind)> {
        let owner = owner.canonical();
        self.entries
            .range((owner, NaiveDate::MIN)..=(owner, NaiveDate::MAX))
            .map(|(&(_, date), &kind)| (date, kind))
            .collect()
    }

    /// Drop all of an owner's exceptions. Returns how many were removed.
    pub fn clear_owner(&mut self, owner: Owner) -> usize {
        let owner = owner.canonical();
        let before = self.entries.len();
        self.entries.retain(|(o, _), _| *o != owner);
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Owner, NaiveDate, ExceptionKind)> + '_ {
        self.entries
            .iter()
            .map(|(&(owner, date), &kind)| (owner, date, kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
