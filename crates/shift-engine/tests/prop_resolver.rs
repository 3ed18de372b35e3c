//! Property-based tests for the resolver using proptest.
//!
//! These check invariants that must hold for any template and interval, not
//! just the scenarios in `resolver_tests.rs`.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use shift_engine::{
    is_working, ExceptionKind, OpenDayBreak, Owner, Resolver, ResolverPolicy, ScheduleConfig,
    TimeOfDay, WorkingWindow,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Minute offsets on a 5-minute grid, keeping the whole query inside one day.
fn arb_minute() -> impl Strategy<Value = u32> {
    (0u32..=287).prop_map(|n| n * 5)
}

/// An active window `[a, b]` with `a < b`.
fn arb_window() -> impl Strategy<Value = (u32, u32)> {
    (arb_minute(), arb_minute())
        .prop_filter("non-empty window", |(a, b)| a != b)
        .prop_map(|(a, b)| (a.min(b), a.max(b)))
}

/// A date in 2026-2027.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..730).prop_map(|d| NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + chrono::Duration::days(d))
}

fn arb_worker() -> impl Strategy<Value = Owner> {
    (1u64..1000).prop_map(Owner::Worker)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn tod(minutes: u32) -> TimeOfDay {
    TimeOfDay::from_minutes(minutes).unwrap()
}

fn win((a, b): (u32, u32)) -> WorkingWindow {
    WorkingWindow::new(tod(a), tod(b))
}

fn instant(date: NaiveDate, minutes: u32) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap() + chrono::Duration::minutes(i64::from(minutes))
}

/// `instant` plus a sub-minute offset.
fn instant_secs(date: NaiveDate, minutes: u32, secs: u32) -> NaiveDateTime {
    instant(date, minutes) + chrono::Duration::seconds(i64::from(secs))
}

fn config_with(date: NaiveDate, open: WorkingWindow, brk: WorkingWindow) -> ScheduleConfig {
    let mut config = ScheduleConfig::new();
    config
        .set_template(Owner::Facility, date.weekday(), open, brk)
        .unwrap();
    config
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// Any interval sharing time with an active break is never working, even
    /// when it only reaches into the break by a few seconds.
    #[test]
    fn break_overlap_is_absolute(
        date in arb_date(),
        worker in arb_worker(),
        brk in arb_window(),
        query in arb_window(),
        secs in 0u32..60,
    ) {
        let config = config_with(date, win((0, 1435)), win(brk));
        let (qs, qe) = query;
        prop_assume!(qs < brk.1 && (qe > brk.0 || (qe == brk.0 && secs > 0)));
        prop_assert!(!is_working(&config, instant(date, qs), instant_secs(date, qe, secs), worker));
    }

    /// Without a break, the verdict is exactly containment in the open window.
    #[test]
    fn verdict_is_containment_without_break(
        date in arb_date(),
        worker in arb_worker(),
        open in arb_window(),
        query in arb_window(),
    ) {
        let config = config_with(date, win(open), WorkingWindow::inactive());
        let (qs, qe) = query;
        let expected = qs >= open.0 && qe <= open.1;
        prop_assert_eq!(is_working(&config, instant(date, qs), instant(date, qe), worker), expected);
    }

    /// A closed exception wins over any template, at either scope.
    #[test]
    fn closed_exception_dominates(
        date in arb_date(),
        worker in arb_worker(),
        open in arb_window(),
        facility_wide in any::<bool>(),
    ) {
        let mut config = config_with(date, win(open), WorkingWindow::inactive());
        let owner = if facility_wide { Owner::Facility } else { worker };
        config.set_exception(owner, ExceptionKind::Closed, date);
        prop_assert!(!is_working(&config, instant(date, open.0), instant(date, open.1), worker));
    }

    /// An open exception turns an inactive day on with the template's hours.
    #[test]
    fn open_exception_forces_activation(
        date in arb_date(),
        worker in arb_worker(),
        open in arb_window(),
    ) {
        let mut config = config_with(date, win(open).deactivated(), WorkingWindow::inactive());
        prop_assert!(!is_working(&config, instant(date, open.0), instant(date, open.1), worker));
        config.set_exception(worker, ExceptionKind::Open, date);
        prop_assert!(is_working(&config, instant(date, open.0), instant(date, open.1), worker));
    }

    /// When worker and facility disagree on a date, the worker entry decides.
    #[test]
    fn worker_exception_precedence(
        date in arb_date(),
        worker in arb_worker(),
        open in arb_window(),
        worker_opens in any::<bool>(),
    ) {
        let mut config = config_with(date, win(open).deactivated(), WorkingWindow::inactive());
        let (mine, theirs) = if worker_opens {
            (ExceptionKind::Open, ExceptionKind::Closed)
        } else {
            (ExceptionKind::Closed, ExceptionKind::Open)
        };
        config.set_exception(worker, mine, date);
        config.set_exception(Owner::Facility, theirs, date);
        let verdict = is_working(&config, instant(date, open.0), instant(date, open.1), worker);
        prop_assert_eq!(verdict, worker_opens);
    }

    /// The whole open window is working; anything past its end is not.
    #[test]
    fn boundary_containment(
        date in arb_date(),
        worker in arb_worker(),
        open in arb_window(),
        delta in 1u32..60,
        secs in 1u32..60,
    ) {
        prop_assume!(open.1 + delta <= 1439);
        let config = config_with(date, win(open), WorkingWindow::inactive());
        prop_assert!(is_working(&config, instant(date, open.0), instant(date, open.1), worker));
        prop_assert!(!is_working(&config, instant(date, open.1), instant(date, open.1 + delta), worker));
        prop_assert!(!is_working(&config, instant(date, open.0), instant_secs(date, open.1, secs), worker));
    }

    /// Suppressing the break on forced days never turns a working verdict off.
    #[test]
    fn suppress_break_only_widens(
        date in arb_date(),
        worker in arb_worker(),
        open in arb_window(),
        brk in arb_window(),
        query in arb_window(),
    ) {
        let mut config = config_with(date, win(open).deactivated(), win(brk));
        config.set_exception(worker, ExceptionKind::Open, date);
        let (qs, qe) = (instant(date, query.0), instant(date, query.1));
        let keep = Resolver::new(&config).is_working(qs, qe, worker);
        let suppress = Resolver::new(&config)
            .with_policy(ResolverPolicy {
                open_day_break: OpenDayBreak::SuppressBreak,
                ..ResolverPolicy::default()
            })
            .is_working(qs, qe, worker);
        prop_assert!(!keep || suppress);
    }

    /// Same inputs, same configuration, same verdict.
    #[test]
    fn resolution_is_pure(
        date in arb_date(),
        worker in arb_worker(),
        open in arb_window(),
        brk in arb_window(),
        query in arb_window(),
    ) {
        let config = config_with(date, win(open), win(brk));
        let (qs, qe) = (instant(date, query.0), instant(date, query.1));
        prop_assert_eq!(is_working(&config, qs, qe, worker), is_working(&config, qs, qe, worker));
    }
}
