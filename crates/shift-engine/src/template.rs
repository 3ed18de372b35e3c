//! Weekly template store.
//!
//! Each owner may configure, per weekday, an open window and a break window.
//! A worker without an explicit entry for a weekday inherits the facility
//! default for that weekday; with neither, the day is fully inactive.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::owner::Owner;
use crate::time_of_day::WorkingWindow;

/// Open and break windows for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTemplate {
    pub open: WorkingWindow,
    #[serde(rename = "break")]
    pub break_window: WorkingWindow,
}

impl DayTemplate {
    pub fn new(open: WorkingWindow, break_window: WorkingWindow) -> Self {
        Self { open, break_window }
    }

    /// A day with no working hours and no break.
    pub fn closed() -> Self {
        Self::new(WorkingWindow::inactive(), WorkingWindow::inactive())
    }

    pub fn validate(&self) -> Result<()> {
        self.open.validate()?;
        self.break_window.validate()
    }

    pub fn is_valid(&self) -> bool {
        self.open.is_valid() && self.break_window.is_valid()
    }

    /// The window of the given kind.
    pub fn window(&self, kind: WindowKind) -> WorkingWindow {
        match kind {
            WindowKind::Open => self.open,
            WindowKind::Break => self.break_window,
        }
    }

    fn with_window(mut self, kind: WindowKind, window: WorkingWindow) -> Self {
        match kind {
            WindowKind::Open => self.open = window,
            WindowKind::Break => self.break_window = window,
        }
        self
    }
}

/// Which of the two daily windows a bulk update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Open,
    Break,
}

/// ISO weekday number: Monday = 1 through Sunday = 7.
pub fn iso_number(weekday: Weekday) -> u8 {
    weekday.number_from_monday() as u8
}

/// Weekday from its ISO number.
pub fn weekday_from_iso(n: u8) -> Result<Weekday> {
    match n {
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        7 => Ok(Weekday::Sun),
        other => Err(ScheduleError::InvalidWeekday(other)),
    }
}

type Week = [Option<DayTemplate>; 7];

fn slot(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

/// Per-owner, per-weekday templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyTemplates {
    weeks: BTreeMap<Owner, Week>,
}

impl WeeklyTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// The template in effect for `owner` on `weekday`.
    ///
    /// Falls back to the facility default, then to [`DayTemplate::closed`].
    pub fn get_template(&self, owner: Owner, weekday: Weekday) -> DayTemplate {
        self.explicit_template(owner, weekday)
            .or_else(|| self.explicit_template(Owner::Facility, weekday))
            .unwrap_or_else(DayTemplate::closed)
    }

    /// Only the entry configured for exactly this owner, without fallback.
    pub fn explicit_template(&self, owner: Owner, weekday: Weekday) -> Option<DayTemplate> {
        self.weeks.get(&owner.canonical()).and_then(|week| week[slot(weekday)])
    }

    /// Replace the entry for `(owner, weekday)`. Rejected without any change
    /// when an active window ends before it starts.
    pub fn set_template(
        &mut self,
        owner: Owner,
        weekday: Weekday,
        open: WorkingWindow,
        break_window: WorkingWindow,
    ) -> Result<()> {
        let template = DayTemplate::new(open, break_window);
        template.validate()?;
        self.weeks.entry(owner.canonical()).or_default()[slot(weekday)] = Some(template);
        Ok(())
    }

    /// Remove the explicit entry so the owner falls back to the facility default.
    /// Returns whether an entry existed.
    pub fn clear_template(&mut self, owner: Owner, weekday: Weekday) -> bool {
        let Some(week) = self.weeks.get_mut(&owner.canonical()) else {
            return false;
        };
        let existed = week[slot(weekday)].take().is_some();
        if week.iter().all(Option::is_none) {
            self.weeks.remove(&owner.canonical());
        }
        existed
    }

    /// Set one window kind across several weekdays.
    ///
    /// The other window of each day is carried over from the owner's effective
    /// template. Every window is validated before anything is written.
    pub fn update_hours(
        &mut self,
        owner: Owner,
        kind: WindowKind,
        hours: &[(Weekday, WorkingWindow)],
    ) -> Result<()> {
        for (_, window) in hours {
            window.validate()?;
        }
        for &(weekday, window) in hours {
            let updated = self.get_template(owner, weekday).with_window(kind, window);
            self.weeks.entry(owner.canonical()).or_default()[slot(weekday)] = Some(updated);
        }
        Ok(())
    }

    /// Drop every explicit template of an owner. Returns how many were removed.
    pub fn clear_owner(&mut self, owner: Owner) -> usize {
        self.weeks
            .remove(&owner.canonical())
            .map(|week| week.iter().flatten().count())
            .unwrap_or(0)
    }

    /// All explicit entries, ordered by owner then weekday.
    pub fn iter(&self) -> impl Iterator<Item = (Owner, Weekday, &DayTemplate)> + '_ {
        self.weeks.iter().flat_map(|(owner, week)| {
            week.iter().enumerate().filter_map(move |(i, day)| {
                day.as_ref().map(|t| (*owner, weekday_at(i), t))
            })
        })
    }

    /// Store an entry as-is. Used when loading persisted configuration, which
    /// may already hold corrupt windows.
    pub(crate) fn insert_stored(&mut self, owner: Owner, weekday: Weekday, template: DayTemplate) {
        self.weeks.entry(owner.canonical()).or_default()[slot(weekday)] = Some(template);
    }
}

fn weekday_at(i: usize) -> Weekday {
    const WEEK: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    WEEK[i]
}
