//! Shared configuration store for concurrent readers and administrative writers.
//!
//! Readers take an `Arc` snapshot and resolve against it without holding any
//! lock. Writers are serialized on the write lock and publish a new snapshot
//! copy-on-write, so a reader sees either the whole of an update or none of it.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{NaiveDate, NaiveDateTime, Weekday};

use crate::config::ScheduleConfig;
use crate::error::Result;
use crate::exception::ExceptionKind;
use crate::owner::Owner;
use crate::resolver::Resolver;
use crate::template::{DayTemplate, WindowKind};
use crate::time_of_day::WorkingWindow;

#[derive(Debug, Default)]
pub struct ScheduleStore {
    current: RwLock<Arc<ScheduleConfig>>,
}

impl ScheduleStore {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// The configuration as of now. Later writes do not affect it.
    pub fn snapshot(&self) -> Arc<ScheduleConfig> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Resolve against the current snapshot.
    pub fn is_working(&self, start: NaiveDateTime, end: NaiveDateTime, owner: Owner) -> bool {
        let snapshot = self.snapshot();
        Resolver::new(&snapshot).is_working(start, end, owner)
    }

    pub fn get_template(&self, owner: Owner, weekday: Weekday) -> DayTemplate {
        self.snapshot().get_template(owner, weekday)
    }

    pub fn get_exception(&self, owner: Owner, date: NaiveDate) -> Option<ExceptionKind> {
        self.snapshot().get_exception(owner, date)
    }

    pub fn set_template(
        &self,
        owner: Owner,
        weekday: Weekday,
        open: WorkingWindow,
        break_window: WorkingWindow,
    ) -> Result<()> {
        self.try_write(|config| config.set_template(owner, weekday, open, break_window))
    }

    pub fn clear_template(&self, owner: Owner, weekday: Weekday) -> bool {
        self.write(|config| config.clear_template(owner, weekday))
    }

    pub fn update_hours(
        &self,
        owner: Owner,
        kind: WindowKind,
        hours: &[(Weekday, WorkingWindow)],
    ) -> Result<()> {
        self.try_write(|config| config.update_hours(owner, kind, hours))
    }

    pub fn set_exception(
        &self,
        owner: Owner,
        kind: ExceptionKind,
        date: NaiveDate,
    ) -> Option<ExceptionKind> {
        self.write(|config| config.set_exception(owner, kind, date))
    }

    pub fn clear_exception(&self, owner: Owner, date: NaiveDate) -> Option<ExceptionKind> {
        self.write(|config| config.clear_exception(owner, date))
    }

    pub fn remove_owner(&self, owner: Owner) -> usize {
        self.write(|config| config.remove_owner(owner))
    }

    /// Replace the whole configuration, e.g. after reloading it from disk.
    pub fn replace(&self, config: ScheduleConfig) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(config);
    }

    /// Apply `update` to a private copy and publish it only on success.
    fn try_write<T>(&self, update: impl FnOnce(&mut ScheduleConfig) -> Result<T>) -> Result<T> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = (**guard).clone();
        let out = update(&mut next)?;
        *guard = Arc::new(next);
        Ok(out)
    }

    /// Apply an infallible update. Clones first if any snapshot is still held.
    fn write<T>(&self, update: impl FnOnce(&mut ScheduleConfig) -> T) -> T {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        update(Arc::make_mut(&mut *guard))
    }
}

impl From<ScheduleConfig> for ScheduleStore {
    fn from(config: ScheduleConfig) -> Self {
        Self::new(config)
    }
}
