//! The availability decision: is a worker working between two local instants?
//!
//! For one calendar date the verdict composes, in order:
//!
//! 1. the exception in effect (worker entry, else facility entry). `Closed`
//!    ends the evaluation;
//! 2. the weekday template (worker entry, else facility default). The day is
//!    on if the template's open window is active, or if an `Open` exception
//!    forces it on. A forced day reuses the template hours;
//! 3. the break window. Any non-empty overlap with an active break rejects
//!    the whole interval;
//! 4. containment. The interval must lie entirely inside the open window.
//!
//! Resolution is pure and never fails: malformed queries and corrupt stored
//! windows both yield `false`.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::config::ScheduleConfig;
use crate::exception::ExceptionKind;
use crate::owner::Owner;
use crate::time_of_day::{TimeOfDay, WorkingWindow};

/// Whether a break still applies on a day forced open by an exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenDayBreak {
    /// The template break applies as on any other day.
    #[default]
    KeepBreak,
    /// A forced-open day has no break.
    SuppressBreak,
}

/// How intervals that run past midnight are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MidnightPolicy {
    /// Such an interval is never working.
    #[default]
    Reject,
    /// Split at each midnight; every per-day piece must be working.
    SplitPerDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverPolicy {
    pub open_day_break: OpenDayBreak,
    pub midnight: MidnightPolicy,
}

/// The effective schedule of one owner on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySchedule {
    Closed,
    Open {
        open: WorkingWindow,
        break_window: WorkingWindow,
        /// True when an `Open` exception turned on an otherwise inactive day.
        forced: bool,
    },
}

impl DaySchedule {
    pub fn is_open(&self) -> bool {
        matches!(self, DaySchedule::Open { .. })
    }

    /// Whether `[start, end]` on this day is working time.
    pub fn admits(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        match self {
            DaySchedule::Closed => false,
            DaySchedule::Open {
                open, break_window, ..
            } => {
                if break_window.active && break_window.overlaps(start, end) {
                    return false;
                }
                start >= open.start && end <= open.end
            }
        }
    }
}

/// Answers availability queries against one configuration snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    config: &'a ScheduleConfig,
    policy: ResolverPolicy,
}

impl<'a> Resolver<'a> {
    /// A resolver using the policy stored in the configuration.
    pub fn new(config: &'a ScheduleConfig) -> Self {
        Self {
            config,
            policy: config.policy,
        }
    }

    /// Override the stored policy for this resolver.
    pub fn with_policy(mut self, policy: ResolverPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ResolverPolicy {
        self.policy
    }

    /// The effective schedule for `owner` on `date`.
    pub fn resolve_day(&self, owner: Owner, date: NaiveDate) -> DaySchedule {
        let exception = self.config.exceptions.resolve_exception(owner, date);
        if exception == Some(ExceptionKind::Closed) {
            return DaySchedule::Closed;
        }

        let template = self.config.templates.get_template(owner, date.weekday());
        if !template.is_valid() {
            warn!(
                %owner,
                %date,
                open = %template.open,
                break_window = %template.break_window,
                "corrupt stored template, treating day as closed"
            );
            return DaySchedule::Closed;
        }

        let forced = exception == Some(ExceptionKind::Open);
        if !forced && !template.open.active {
            return DaySchedule::Closed;
        }

        let break_window = if forced && self.policy.open_day_break == OpenDayBreak::SuppressBreak {
            template.break_window.deactivated()
        } else {
            template.break_window
        };

        DaySchedule::Open {
            open: template.open,
            break_window,
            forced: forced && !template.open.active,
        }
    }

    /// Is `owner` working for the whole of `[start, end]`?
    ///
    /// The start is truncated and the end rounded up to whole minutes, so a
    /// partial minute counts as occupied. An `end` falling exactly on a
    /// midnight closes the previous day at `24:00`. Intervals spanning more than one date follow the
    /// [`MidnightPolicy`].
    pub fn is_working(&self, start: NaiveDateTime, end: NaiveDateTime, owner: Owner) -> bool {
        if start >= end {
            trace!(%owner, %start, %end, "empty or inverted interval");
            return false;
        }

        let start_date = start.date();
        let (end_date, end_time) = if end.time() == NaiveTime::MIN {
            (
                end.date().pred_opt().unwrap_or(start_date),
                TimeOfDay::END_OF_DAY,
            )
        } else {
            (end.date(), TimeOfDay::ceil_of(end))
        };
        let start_time = TimeOfDay::of(start);

        let verdict = if start_date == end_date {
            self.resolve_day(owner, start_date).admits(start_time, end_time)
        } else {
            match self.policy.midnight {
                MidnightPolicy::Reject => false,
                MidnightPolicy::SplitPerDay => start_date
                    .iter_days()
                    .take_while(|date| *date <= end_date)
                    .all(|date| {
                        let from = if date == start_date {
                            start_time
                        } else {
                            TimeOfDay::MIDNIGHT
                        };
                        let to = if date == end_date {
                            end_time
                        } else {
                            TimeOfDay::END_OF_DAY
                        };
                        self.resolve_day(owner, date).admits(from, to)
                    }),
            }
        };

        trace!(%owner, %start, %end, verdict, "availability resolved");
        verdict
    }
}

/// Is `owner` working for the whole of `[start, end]` under `config`?
///
/// Shorthand for [`Resolver::new`] followed by [`Resolver::is_working`].
pub fn is_working(
    config: &ScheduleConfig,
    start: NaiveDateTime,
    end: NaiveDateTime,
    owner: Owner,
) -> bool {
    Resolver::new(config).is_working(start, end, owner)
}

/// The effective schedule of `owner` on `date` under `config`.
pub fn resolve_day(config: &ScheduleConfig, owner: Owner, date: NaiveDate) -> DaySchedule {
    Resolver::new(config).resolve_day(owner, date)
}
