//! # shift-engine
//!
//! Deterministic worker availability for appointment booking.
//!
//! Answers one question: is a worker working for the whole of an interval on
//! the facility's local calendar? The answer composes a recurring weekly
//! template (open hours plus a break) with date-specific exceptions, each at
//! two scopes: the facility default and per-worker overrides.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{NaiveDate, Weekday};
//! use shift_engine::{is_working, ExceptionKind, Owner, ScheduleConfig, WorkingWindow};
//!
//! let mut config = ScheduleConfig::new();
//! config
//!     .set_template(
//!         Owner::Facility,
//!         Weekday::Mon,
//!         WorkingWindow::parse("15:00-20:00").unwrap(),
//!         WorkingWindow::parse("16:00-17:00").unwrap(),
//!     )
//!     .unwrap();
//!
//! let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
//! let at = |h, m| monday.and_hms_opt(h, m, 0).unwrap();
//! let worker = Owner::Worker(7);
//!
//! assert!(is_working(&config, at(18, 30), at(19, 30), worker));
//! assert!(!is_working(&config, at(15, 30), at(16, 30), worker)); // break
//!
//! config.set_exception(worker, ExceptionKind::Closed, monday);
//! assert!(!is_working(&config, at(18, 30), at(19, 30), worker));
//! ```
//!
//! ## Modules
//!
//! - [`time_of_day`]: Clock values, working windows, containment and overlap
//! - [`template`]: Weekly template store with facility fallback
//! - [`exception`]: Date exceptions (`Closed` / `Open`)
//! - [`resolver`]: The `is_working` decision and per-day schedules
//! - [`config`]: Configuration snapshot, writers, JSON persistence
//! - [`store`]: Snapshot store for concurrent readers and writers
//! - [`owner`]: Facility / worker ownership scope
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod exception;
pub mod owner;
pub mod resolver;
pub mod store;
pub mod template;
pub mod time_of_day;

pub use config::{ConfigIssue, ScheduleConfig};
pub use error::ScheduleError;
pub use exception::{parse_date, ExceptionCalendar, ExceptionKind};
pub use owner::Owner;
pub use resolver::{
    is_working, resolve_day, DaySchedule, MidnightPolicy, OpenDayBreak, Resolver, ResolverPolicy,
};
pub use store::ScheduleStore;
pub use template::{iso_number, weekday_from_iso, DayTemplate, WeeklyTemplates, WindowKind};
pub use time_of_day::{TimeOfDay, WorkingWindow};
