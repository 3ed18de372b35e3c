//! Tests for the shared configuration store under concurrent use.

use std::sync::Arc;
use std::thread;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use shift_engine::{ExceptionKind, Owner, ScheduleConfig, ScheduleStore, TimeOfDay, WorkingWindow};

fn window(s: &str) -> WorkingWindow {
    WorkingWindow::parse(s).unwrap()
}

fn at(day: &str, hm: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{day} {hm}"), "%Y-%m-%d %H:%M").unwrap()
}

fn monday_store() -> ScheduleStore {
    let store = ScheduleStore::default();
    store
        .set_template(Owner::Facility, Weekday::Mon, window("09:00-17:00"), window("12:00-13:00"))
        .unwrap();
    store
}

#[test]
fn snapshot_is_unaffected_by_later_writes() {
    let store = monday_store();
    let before = store.snapshot();

    store.set_exception(Owner::Facility, ExceptionKind::Closed, "2026-10-26".parse().unwrap());

    let worker = Owner::Worker(2);
    assert!(shift_engine::is_working(&before, at("2026-10-26", "09:00"), at("2026-10-26", "10:00"), worker));
    assert!(!store.is_working(at("2026-10-26", "09:00"), at("2026-10-26", "10:00"), worker));
}

#[test]
fn rejected_write_leaves_published_config_untouched() {
    let store = monday_store();
    let before = store.snapshot();

    let inverted = WorkingWindow::new(
        "17:00".parse::<TimeOfDay>().unwrap(),
        "09:00".parse::<TimeOfDay>().unwrap(),
    );
    assert!(store
        .set_template(Owner::Facility, Weekday::Mon, inverted, WorkingWindow::inactive())
        .is_err());

    assert_eq!(*store.snapshot(), *before);
}

#[test]
fn clear_and_remove_go_through_the_store() {
    let store = monday_store();
    let day: NaiveDate = "2026-10-26".parse().unwrap();
    store.set_exception(Owner::Worker(3), ExceptionKind::Closed, day);
    assert_eq!(store.get_exception(Owner::Worker(3), day), Some(ExceptionKind::Closed));
    assert_eq!(store.clear_exception(Owner::Worker(3), day), Some(ExceptionKind::Closed));

    store
        .set_template(Owner::Worker(3), Weekday::Mon, window("13:00-17:00"), WorkingWindow::inactive())
        .unwrap();
    assert!(store.clear_template(Owner::Worker(3), Weekday::Mon));
    assert_eq!(store.get_template(Owner::Worker(3), Weekday::Mon).open, window("09:00-17:00"));

    store.set_exception(Owner::Worker(3), ExceptionKind::Open, day);
    assert_eq!(store.remove_owner(Owner::Worker(3)), 1);

    store.replace(ScheduleConfig::new());
    assert!(!store.is_working(at("2026-10-26", "09:00"), at("2026-10-26", "10:00"), Owner::Facility));
}

#[test]
fn readers_never_see_half_applied_templates() {
    // Writers flip Monday between two complete templates. A half-applied
    // write would pair one template's open window with the other's break.
    let early = (window("08:00-12:00"), window("10:00-10:30"));
    let late = (window("14:00-18:00"), window("16:00-16:30"));

    let store = Arc::new(ScheduleStore::default());
    store
        .set_template(Owner::Facility, Weekday::Mon, early.0, early.1)
        .unwrap();

    thread::scope(|scope| {
        for i in 0..2 {
            let store = Arc::clone(&store);
            scope.spawn(move || {
                for n in 0..500 {
                    let (open, brk) = if (n + i) % 2 == 0 { early } else { late };
                    store.set_template(Owner::Facility, Weekday::Mon, open, brk).unwrap();
                }
            });
        }
        for _ in 0..4 {
            let store = Arc::clone(&store);
            scope.spawn(move || {
                for _ in 0..500 {
                    let day = store.get_template(Owner::Worker(9), Weekday::Mon);
                    let pair = (day.open, day.break_window);
                    assert!(pair == early || pair == late, "torn template: {pair:?}");
                }
            });
        }
    });
}

#[test]
fn parallel_slot_queries_agree_with_single_threaded_answers() {
    let store = Arc::new(monday_store());
    let slots: Vec<(NaiveDateTime, NaiveDateTime)> = (0..48)
        .map(|i| {
            let start = at("2026-10-26", "00:00") + chrono::Duration::minutes(30 * i);
            (start, start + chrono::Duration::minutes(30))
        })
        .collect();
    let expected: Vec<bool> = slots
        .iter()
        .map(|&(s, e)| store.is_working(s, e, Owner::Worker(1)))
        .collect();
    // 09:00-12:00 and 13:00-17:00 in half hours.
    assert_eq!(expected.iter().filter(|v| **v).count(), 14);

    thread::scope(|scope| {
        for _ in 0..4 {
            let store = Arc::clone(&store);
            let slots = &slots;
            let expected = &expected;
            scope.spawn(move || {
                let got: Vec<bool> = slots
                    .iter()
                    .map(|&(s, e)| store.is_working(s, e, Owner::Worker(1)))
                    .collect();
                assert_eq!(&got, expected);
            });
        }
    });
}
