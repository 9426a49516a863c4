//! Integration tests for todo and calendar reminders.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use flowgenix_core::effects::RecordingCapabilities;
use flowgenix_core::reminder::ReminderKind;
use flowgenix_core::{
    Action, App, Capabilities, Config, Event, EventDraft, HistoryAction, ManualClock, Priority,
    Store, TodoDraft,
};

fn dt(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 9, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn setup(now: NaiveDateTime) -> (App, ManualClock, RecordingCapabilities) {
    let clock = ManualClock::new(now);
    let rec = RecordingCapabilities::new();
    let app = App::with_parts(
        Store::open_memory().unwrap(),
        Config::default(),
        Capabilities::recording(&rec),
        Box::new(clock.clone()),
    )
    .unwrap();
    (app, clock, rec)
}

fn add_todo(app: &mut App, title: &str, due: NaiveDateTime) -> String {
    let out = app
        .dispatch(Action::AddTodo(TodoDraft {
            title: title.into(),
            due_at: Some(due),
            priority: Priority::Medium,
            ..TodoDraft::default()
        }))
        .unwrap();
    match &out.events[0] {
        Event::TaskAdded { id, .. } => id.clone(),
        other => panic!("unexpected event {other:?}"),
    }
}

fn fired(app: &mut App, clock: &ManualClock, at: NaiveDateTime) -> Vec<ReminderKind> {
    clock.set(at);
    app.dispatch(Action::Poll)
        .unwrap()
        .events
        .into_iter()
        .filter_map(|e| match e {
            Event::ReminderFired { kind, .. } => Some(kind),
            _ => None,
        })
        .collect()
}

#[test]
fn morning_task_tomorrow_gets_evening_and_hour_before() {
    let (mut app, _, _) = setup(dt(1, 14, 0));
    add_todo(&mut app, "Lab report", dt(2, 8, 0));
    let pending: Vec<_> = app
        .pending_reminders()
        .into_iter()
        .map(|(at, r)| (at, r.kind))
        .collect();
    assert_eq!(
        pending,
        vec![
            (dt(1, 20, 0), ReminderKind::EveningBefore),
            (dt(2, 7, 0), ReminderKind::HourBefore),
        ]
    );
}

#[test]
fn past_candidates_are_never_scheduled() {
    let (mut app, _, _) = setup(dt(1, 21, 0));
    add_todo(&mut app, "Lab report", dt(2, 8, 0));
    assert_eq!(app.pending_reminders().len(), 1);
}

#[test]
fn reminders_fire_with_speech_and_history() {
    let (mut app, clock, rec) = setup(dt(1, 14, 0));
    add_todo(&mut app, "Lab report", dt(2, 8, 0));

    assert!(fired(&mut app, &clock, dt(1, 19, 59)).is_empty());
    assert_eq!(
        fired(&mut app, &clock, dt(1, 20, 0)),
        vec![ReminderKind::EveningBefore]
    );
    assert!(rec
        .calls()
        .iter()
        .any(|c| c == "speak:Reminder: Lab report is due tomorrow morning"));
    assert_eq!(app.state().history.count(HistoryAction::ReminderSent), 1);
}

#[test]
fn completing_cancels_and_reopening_reschedules() {
    let (mut app, clock, _) = setup(dt(1, 14, 0));
    let id = add_todo(&mut app, "Essay", dt(3, 15, 0));
    assert_eq!(app.pending_reminders().len(), 2);

    app.dispatch(Action::ToggleTodo(id.clone())).unwrap();
    assert!(app.pending_reminders().is_empty());
    assert!(fired(&mut app, &clock, dt(3, 23, 0)).is_empty());

    clock.set(dt(3, 10, 0));
    app.dispatch(Action::ToggleTodo(id)).unwrap();
    let pending = app.pending_reminders();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].1.kind, ReminderKind::HourBefore);
}

#[test]
fn editing_replaces_rather_than_duplicates() {
    let (mut app, _, _) = setup(dt(1, 8, 0));
    let id = add_todo(&mut app, "Essay", dt(2, 15, 0));
    app.dispatch(Action::EditTodo {
        id,
        draft: TodoDraft {
            title: "Essay v2".into(),
            due_at: Some(dt(4, 10, 0)),
            ..TodoDraft::default()
        },
    })
    .unwrap();
    let pending: Vec<_> = app.pending_reminders().into_iter().map(|(at, _)| at).collect();
    assert_eq!(pending, vec![dt(3, 20, 0), dt(4, 9, 0)]);
}

#[test]
fn deleted_todo_never_reminds() {
    let (mut app, clock, rec) = setup(dt(1, 8, 0));
    let id = add_todo(&mut app, "Essay", dt(2, 15, 0));
    app.dispatch(Action::DeleteTodo(id)).unwrap();
    assert!(fired(&mut app, &clock, dt(5, 0, 0)).is_empty());
    assert!(!rec.calls().iter().any(|c| c.starts_with("speak:")));
}

#[test]
fn calendar_events_remind_only_when_enabled() {
    let (mut app, clock, _) = setup(dt(1, 8, 0));
    let draft = |title: &str, reminder_enabled| EventDraft {
        title: title.into(),
        date: NaiveDate::from_ymd_opt(2026, 9, 2).unwrap(),
        time: NaiveTime::from_hms_opt(18, 0, 0),
        description: String::new(),
        reminder_enabled,
    };
    app.dispatch(Action::AddEvent(draft("Gym", true))).unwrap();
    app.dispatch(Action::AddEvent(draft("Quiet", false))).unwrap();
    assert_eq!(app.pending_reminders().len(), 2);

    let kinds = fired(&mut app, &clock, dt(2, 17, 0));
    assert_eq!(kinds, vec![ReminderKind::MorningOf, ReminderKind::HourBefore]);
}

#[test]
fn reopening_the_app_reschedules_from_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowgenix.db");
    let clock = ManualClock::new(dt(1, 8, 0));
    {
        let mut app = App::with_parts(
            Store::open_at(&path).unwrap(),
            Config::default(),
            Capabilities::headless(),
            Box::new(clock.clone()),
        )
        .unwrap();
        add_todo(&mut app, "Essay", dt(2, 15, 0));
    }
    clock.advance(Duration::hours(2));
    let app = App::with_parts(
        Store::open_at(&path).unwrap(),
        Config::default(),
        Capabilities::headless(),
        Box::new(clock),
    )
    .unwrap();
    assert_eq!(app.pending_reminders().len(), 2);
}

#[test]
fn failed_store_write_keeps_later_reminders_queued() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowgenix.db");
    let clock = ManualClock::new(dt(10, 12, 0));
    let mut app = App::with_parts(
        Store::open_at(&path).unwrap(),
        Config::default(),
        Capabilities::headless(),
        Box::new(clock.clone()),
    )
    .unwrap();
    add_todo(&mut app, "Lab report", dt(11, 8, 0));
    add_todo(&mut app, "Reading", dt(11, 8, 0));
    assert_eq!(app.pending_reminders().len(), 4);

    let side = rusqlite::Connection::open(&path).unwrap();
    side.execute_batch("DROP TABLE kv;").unwrap();

    clock.set(dt(10, 20, 0));
    assert!(app.dispatch(Action::Poll).is_err());
    assert_eq!(app.pending_reminders().len(), 3);

    side.execute_batch("CREATE TABLE kv (key TEXT PRIMARY KEY, value TEXT NOT NULL);")
        .unwrap();
    let retry = fired(&mut app, &clock, dt(10, 20, 0));
    assert_eq!(retry, vec![ReminderKind::EveningBefore]);
    assert_eq!(app.pending_reminders().len(), 2);
    assert_eq!(app.state().history.count(HistoryAction::ReminderSent), 2);
}
