//! Tests for the exception calendar.

use chrono::NaiveDate;
use shift_engine::{ExceptionCalendar, ExceptionKind, Owner};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn later_write_replaces_earlier_one() {
    let mut calendar = ExceptionCalendar::new();
    let worker = Owner::Worker(1);
    assert_eq!(
        calendar.set_exception(worker, ExceptionKind::Closed, date("2026-12-25")),
        None
    );
    assert_eq!(
        calendar.set_exception(worker, ExceptionKind::Open, date("2026-12-25")),
        Some(ExceptionKind::Closed)
    );
    assert_eq!(
        calendar.get_exception(worker, date("2026-12-25")),
        Some(ExceptionKind::Open)
    );
    assert_eq!(calendar.len(), 1);
}

#[test]
fn worker_entry_wins_over_facility_entry() {
    let mut calendar = ExceptionCalendar::new();
    let worker = Owner::Worker(1);
    let day = date("2026-12-24");
    calendar.set_exception(Owner::Facility, ExceptionKind::Closed, day);
    calendar.set_exception(worker, ExceptionKind::Open, day);

    assert_eq!(calendar.resolve_exception(worker, day), Some(ExceptionKind::Open));
    assert_eq!(
        calendar.resolve_exception(Owner::Worker(2), day),
        Some(ExceptionKind::Closed)
    );
    assert_eq!(calendar.resolve_exception(worker, date("2026-12-23")), None);
}

#[test]
fn exact_read_does_not_fall_back() {
    let mut calendar = ExceptionCalendar::new();
    let day = date("2027-01-01");
    calendar.set_exception(Owner::Facility, ExceptionKind::Closed, day);
    assert_eq!(calendar.get_exception(Owner::Worker(3), day), None);
}

#[test]
fn clear_removes_only_that_key() {
    let mut calendar = ExceptionCalendar::new();
    let worker = Owner::Worker(1);
    let day = date("2026-12-25");
    calendar.set_exception(worker, ExceptionKind::Closed, day);
    calendar.set_exception(Owner::Facility, ExceptionKind::Closed, day);

    assert_eq!(calendar.clear_exception(worker, day), Some(ExceptionKind::Closed));
    assert_eq!(calendar.clear_exception(worker, day), None);
    // The facility holiday now applies to the worker.
    assert_eq!(calendar.resolve_exception(worker, day), Some(ExceptionKind::Closed));
}

#[test]
fn exceptions_for_lists_one_owner_in_date_order() {
    let mut calendar = ExceptionCalendar::new();
    let worker = Owner::Worker(6);
    calendar.set_exception(worker, ExceptionKind::Open, date("2026-11-08"));
    calendar.set_exception(worker, ExceptionKind::Closed, date("2026-10-19"));
    calendar.set_exception(Owner::Worker(7), ExceptionKind::Closed, date("2026-10-20"));
    calendar.set_exception(Owner::Facility, ExceptionKind::Closed, date("2026-10-21"));

    assert_eq!(
        calendar.exceptions_for(worker),
        vec![
            (date("2026-10-19"), ExceptionKind::Closed),
            (date("2026-11-08"), ExceptionKind::Open),
        ]
    );
    assert_eq!(calendar.clear_owner(worker), 2);
    assert_eq!(calendar.len(), 2);
}
