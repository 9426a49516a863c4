//! Integration tests for the focus session lifecycle.
//!
//! Drives an `App` second by second on a manual clock and checks rewards,
//! history and side effects end to end.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use flowgenix_core::effects::RecordingCapabilities;
use flowgenix_core::{
    Action, App, Capabilities, Config, CoreError, Event, HistoryAction, ManualClock,
    SessionState, Store,
};

fn morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 4, 20)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn setup() -> (App, ManualClock, RecordingCapabilities) {
    let clock = ManualClock::new(morning());
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

fn tick(app: &mut App, clock: &ManualClock, secs: u64) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..secs {
        clock.advance(Duration::seconds(1));
        events.extend(app.dispatch(Action::Tick).unwrap().events);
    }
    events
}

fn run_to_completion(minutes: u32) -> (App, Vec<Event>) {
    let (mut app, clock, _) = setup();
    app.dispatch(Action::SetDuration(minutes)).unwrap();
    app.dispatch(Action::StartSession).unwrap();
    let events = tick(&mut app, &clock, u64::from(minutes) * 60);
    (app, events)
}

#[test]
fn twenty_five_minutes_earns_fifty_coins() {
    let (app, events) = run_to_completion(25);
    assert_eq!(app.state().ledger.coins(), 50);
    assert_eq!(app.state().history.count(HistoryAction::TimerComplete), 1);
    assert_eq!(app.state().session.state(), SessionState::Idle);
    assert_eq!(app.state().session.time_left_secs(), 25 * 60);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::SessionRewarded {
            coins_earned: 50,
            balance: 50,
            streak_days: 1,
            ..
        }
    )));
}

#[test]
fn five_minutes_earns_ten_coins() {
    let (app, _) = run_to_completion(5);
    assert_eq!(app.state().ledger.coins(), 10);
    assert_eq!(app.state().ledger.total_sessions, 1);
    assert_eq!(app.state().ledger.total_focus_minutes, 5);
}

#[test]
fn short_sessions_round_down() {
    let (app, _) = run_to_completion(4);
    assert_eq!(app.state().ledger.coins(), 0);
    assert_eq!(app.state().history.count(HistoryAction::TimerComplete), 1);
}

#[test]
fn completion_fires_exactly_once() {
    let (mut app, clock, _) = setup();
    app.dispatch(Action::SetDuration(1)).unwrap();
    app.dispatch(Action::StartSession).unwrap();
    let events = tick(&mut app, &clock, 60 + 30);
    let completions = events
        .iter()
        .filter(|e| matches!(e, Event::TimerCompleted { .. }))
        .count();
    assert_eq!(completions, 1);
    assert_eq!(app.state().history.count(HistoryAction::TimerComplete), 1);
}

#[test]
fn pause_and_resume_preserve_time_left() {
    let (mut app, clock, _) = setup();
    app.dispatch(Action::StartSession).unwrap();
    tick(&mut app, &clock, 100);
    app.dispatch(Action::PauseSession).unwrap();
    let left = app.state().session.time_left_secs();
    assert_eq!(left, 25 * 60 - 100);

    tick(&mut app, &clock, 500);
    assert_eq!(app.state().session.time_left_secs(), left);

    app.dispatch(Action::ResumeSession).unwrap();
    assert_eq!(app.state().session.time_left_secs(), left);
    tick(&mut app, &clock, 1);
    assert_eq!(app.state().session.time_left_secs(), left - 1);
}

#[test]
fn reset_awards_nothing_and_restores_duration() {
    let (mut app, clock, rec) = setup();
    app.dispatch(Action::SetDuration(10)).unwrap();
    app.dispatch(Action::StartSession).unwrap();
    tick(&mut app, &clock, 9 * 60);

    assert!(matches!(
        app.dispatch(Action::ResetSession { confirmed: false }),
        Err(CoreError::ConfirmationRequired { .. })
    ));
    app.dispatch(Action::ResetSession { confirmed: true }).unwrap();

    assert_eq!(app.state().ledger.coins(), 0);
    assert_eq!(app.state().session.time_left_secs(), 10 * 60);
    assert_eq!(app.state().history.count(HistoryAction::TimerReset), 1);
    assert_eq!(app.state().history.count(HistoryAction::TimerComplete), 0);
    let calls = rec.calls();
    assert!(calls.contains(&"overlay_hide".to_string()));
    assert!(calls.contains(&"audio_stop".to_string()));
}

#[test]
fn completion_runs_teardown_and_celebration_effects() {
    let (mut app, clock, rec) = setup();
    app.dispatch(Action::SetDuration(1)).unwrap();
    app.dispatch(Action::StartSession).unwrap();
    rec.clear();
    tick(&mut app, &clock, 60);

    let calls = rec.calls();
    assert!(calls.contains(&"notify:Focus Session Complete!".to_string()));
    assert!(calls.iter().any(|c| c.starts_with("audio_once:")));
    assert!(rec
        .notices()
        .iter()
        .any(|n| n.message.contains("+0 coins")));
}

#[test]
fn streak_extends_across_consecutive_days() {
    let (mut app, clock, _) = setup();
    app.dispatch(Action::SetDuration(5)).unwrap();
    for _ in 0..2 {
        app.dispatch(Action::StartSession).unwrap();
        tick(&mut app, &clock, 5 * 60);
        clock.advance(Duration::days(1));
    }
    assert_eq!(app.state().ledger.streak_days, 2);

    clock.advance(Duration::days(2));
    app.dispatch(Action::StartSession).unwrap();
    tick(&mut app, &clock, 5 * 60);
    assert_eq!(app.state().ledger.streak_days, 1);
}

#[test]
fn state_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowgenix.db");
    let clock = ManualClock::new(morning());
    {
        let mut app = App::with_parts(
            Store::open_at(&path).unwrap(),
            Config::default(),
            Capabilities::headless(),
            Box::new(clock.clone()),
        )
        .unwrap();
        app.dispatch(Action::SetDuration(5)).unwrap();
        app.dispatch(Action::StartSession).unwrap();
        tick(&mut app, &clock, 5 * 60);
    }
    let app = App::with_parts(
        Store::open_at(&path).unwrap(),
        Config::default(),
        Capabilities::headless(),
        Box::new(clock),
    )
    .unwrap();
    assert_eq!(app.state().ledger.coins(), 10);
    assert_eq!(app.state().history.count(HistoryAction::TimerComplete), 1);
}
