//! Configuration snapshot: weekly templates, exceptions and resolver policy.
//!
//! A [`ScheduleConfig`] is what the resolver reads. It is a plain value; the
//! writers here validate every update before applying it, and
//! [`ScheduleStore`](crate::store::ScheduleStore) publishes snapshots to
//! concurrent readers.
//!
//! ## File format
//!
//! ```json
//! {
//!   "policy": { "open_day_break": "keep_break", "midnight": "reject" },
//!   "templates": [
//!     { "owner": 0, "weekday": 1,
//!       "open":  { "active": true, "start": "10:30", "end": "20:00" },
//!       "break": { "active": false, "start": "12:00", "end": "13:00" } }
//!   ],
//!   "exceptions": [ { "owner": 7, "date": "2026-12-25", "kind": "closed" } ]
//! }
//! ```
//!
//! Owners are raw ids (`0` = facility), weekdays ISO numbers (Monday = 1).
//! Loading keeps active windows whose start is after their end; see
//! [`ScheduleConfig::validate`].

use std::fmt;
use std::path::Path;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::exception::{parse_date, ExceptionCalendar, ExceptionKind};
use crate::owner::Owner;
use crate::resolver::ResolverPolicy;
use crate::template::{iso_number, weekday_from_iso, DayTemplate, WeeklyTemplates, WindowKind};
use crate::time_of_day::WorkingWindow;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub(crate) templates: WeeklyTemplates,
    pub(crate) exceptions: ExceptionCalendar,
    pub policy: ResolverPolicy,
}

impl ScheduleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ResolverPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn templates(&self) -> &WeeklyTemplates {
        &self.templates
    }

    pub fn exceptions(&self) -> &ExceptionCalendar {
        &self.exceptions
    }

    // ── Readers ─────────────────────────────────────────────────────────

    /// The template in effect for `owner` on `weekday`, after fallback.
    pub fn get_template(&self, owner: Owner, weekday: Weekday) -> DayTemplate {
        self.templates.get_template(owner, weekday)
    }

    /// The exception stored for exactly `owner` on `date`.
    pub fn get_exception(&self, owner: Owner, date: NaiveDate) -> Option<ExceptionKind> {
        self.exceptions.get_exception(owner, date)
    }

    /// The exception in effect for `owner` on `date`, after fallback.
    pub fn resolve_exception(&self, owner: Owner, date: NaiveDate) -> Option<ExceptionKind> {
        self.exceptions.resolve_exception(owner, date)
    }

    // ── Writers ─────────────────────────────────────────────────────────

    pub fn set_template(
        &mut self,
        owner: Owner,
        weekday: Weekday,
        open: WorkingWindow,
        break_window: WorkingWindow,
    ) -> Result<()> {
        self.templates.set_template(owner, weekday, open, break_window)?;
        debug!(%owner, %weekday, %open, %break_window, "template set");
        Ok(())
    }

    pub fn clear_template(&mut self, owner: Owner, weekday: Weekday) -> bool {
        let existed = self.templates.clear_template(owner, weekday);
        debug!(%owner, %weekday, existed, "template cleared");
        existed
    }

    pub fn update_hours(
        &mut self,
        owner: Owner,
        kind: WindowKind,
        hours: &[(Weekday, WorkingWindow)],
    ) -> Result<()> {
        self.templates.update_hours(owner, kind, hours)?;
        debug!(%owner, ?kind, days = hours.len(), "weekly hours updated");
        Ok(())
    }

    /// Upsert the exception for `(owner, date)`. Returns the replaced kind.
    pub fn set_exception(
        &mut self,
        owner: Owner,
        kind: ExceptionKind,
        date: NaiveDate,
    ) -> Option<ExceptionKind> {
        let previous = self.exceptions.set_exception(owner, kind, date);
        debug!(%owner, %kind, %date, ?previous, "exception set");
        previous
    }

    /// Returns the removed kind, if there was one.
    pub fn clear_exception(&mut self, owner: Owner, date: NaiveDate) -> Option<ExceptionKind> {
        let removed = self.exceptions.clear_exception(owner, date);
        debug!(%owner, %date, ?removed, "exception cleared");
        removed
    }

    /// Drop every template and exception of an owner. Returns how many
    /// entries were removed.
    pub fn remove_owner(&mut self, owner: Owner) -> usize {
        let removed = self.templates.clear_owner(owner) + self.exceptions.clear_owner(owner);
        debug!(%owner, removed, "owner configuration removed");
        removed
    }

    /// Every stored window that is active but ends before it starts.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for (owner, weekday, template) in self.templates.iter() {
            for kind in [WindowKind::Open, WindowKind::Break] {
                let window = template.window(kind);
                if !window.is_valid() {
                    issues.push(ConfigIssue {
                        owner,
                        weekday,
                        kind,
                        window,
                    });
                }
            }
        }
        issues
    }

    // ── Persistence ─────────────────────────────────────────────────────

    pub fn from_json(json: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(json)?;
        file.into_config()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&ConfigFile::from_config(self))?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_pretty()?)?;
        debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// A corrupt stored window found by [`ScheduleConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigIssue {
    pub owner: Owner,
    pub weekday: Weekday,
    pub kind: WindowKind,
    pub window: WorkingWindow,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            WindowKind::Open => "open",
            WindowKind::Break => "break",
        };
        write!(
            f,
            "{} {}: {kind} window starts after it ends ({}-{})",
            self.owner, self.weekday, self.window.start, self.window.end
        )
    }
}

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for the on-disk layout
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    policy: ResolverPolicy,
    #[serde(default)]
    templates: Vec<TemplateEntry>,
    #[serde(default)]
    exceptions: Vec<ExceptionEntry>,
}

#[derive(Serialize, Deserialize)]
struct TemplateEntry {
    owner: u64,
    weekday: u8,
    open: WindowEntry,
    #[serde(rename = "break")]
    break_window: WindowEntry,
}

#[derive(Serialize, Deserialize)]
struct WindowEntry {
    active: bool,
    start: String,
    end: String,
}

#[derive(Serialize, Deserialize)]
struct ExceptionEntry {
    owner: u64,
    date: String,
    kind: ExceptionKind,
}

impl WindowEntry {
    fn into_window(self) -> Result<WorkingWindow> {
        Ok(WorkingWindow {
            active: self.active,
            start: self.start.parse()?,
            end: self.end.parse()?,
        })
    }
}

impl From<WorkingWindow> for WindowEntry {
    fn from(w: WorkingWindow) -> Self {
        Self {
            active: w.active,
            start: w.start.to_string(),
            end: w.end.to_string(),
        }
    }
}

impl ConfigFile {
    fn into_config(self) -> Result<ScheduleConfig> {
        let mut config = ScheduleConfig::new().with_policy(self.policy);
        for entry in self.templates {
            let weekday = weekday_from_iso(entry.weekday)?;
            let template = DayTemplate::new(
                entry.open.into_window()?,
                entry.break_window.into_window()?,
            );
            config
                .templates
                .insert_stored(Owner::from_id(entry.owner), weekday, template);
        }
        for entry in self.exceptions {
            let date = parse_date(&entry.date)?;
            config
                .exceptions
                .set_exception(Owner::from_id(entry.owner), entry.kind, date);
        }
        Ok(config)
    }

    fn from_config(config: &ScheduleConfig) -> Self {
        Self {
            policy: config.policy,
            templates: config
                .templates
                .iter()
                .map(|(owner, weekday, t)| TemplateEntry {
                    owner: owner.id(),
                    weekday: iso_number(weekday),
                    open: t.open.into(),
                    break_window: t.break_window.into(),
                })
                .collect(),
            exceptions: config
                .exceptions
                .iter()
                .map(|(owner, date, kind)| ExceptionEntry {
                    owner: owner.id(),
                    date: date.format("%Y-%m-%d").to_string(),
                    kind,
                })
                .collect(),
        }
    }
}
