//! Integration tests for the todo list and the coin economy.

use chrono::{NaiveDate, NaiveDateTime};
use flowgenix_core::error::{ImportError, LedgerError};
use flowgenix_core::{
    Action, App, Capabilities, Config, CoreError, Event, HistoryAction, ManualClock, Priority,
    Store, TodoDraft, TodoFilter, ValidationError,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 5)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn setup() -> App {
    App::with_parts(
        Store::open_memory().unwrap(),
        Config::default(),
        Capabilities::headless(),
        Box::new(ManualClock::new(now())),
    )
    .unwrap()
}

fn add(app: &mut App, title: &str, priority: Priority) -> String {
    let out = app
        .dispatch(Action::AddTodo(TodoDraft {
            title: title.into(),
            description: String::new(),
            due_at: Some(now() + chrono::Duration::days(1)),
            priority,
        }))
        .unwrap();
    match &out.events[0] {
        Event::TaskAdded { id, .. } => id.clone(),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn high_priority_completion_earns_fifteen() {
    let mut app = setup();
    let id = add(&mut app, "Ship release", Priority::High);
    app.dispatch(Action::ToggleTodo(id)).unwrap();
    assert_eq!(app.state().ledger.coins(), 15);
    assert_eq!(app.state().history.count(HistoryAction::TaskCompleted), 1);
}

#[test]
fn reopening_keeps_coins() {
    let mut app = setup();
    let id = add(&mut app, "Read", Priority::Low);
    app.dispatch(Action::ToggleTodo(id.clone())).unwrap();
    app.dispatch(Action::ToggleTodo(id)).unwrap();
    assert_eq!(app.state().ledger.coins(), 5);
    assert_eq!(app.state().history.count(HistoryAction::TaskUncompleted), 1);
}

#[test]
fn missing_title_is_rejected_without_change() {
    let mut app = setup();
    let err = app
        .dispatch(Action::AddTodo(TodoDraft {
            title: "   ".into(),
            due_at: Some(now()),
            ..TodoDraft::default()
        }))
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::MissingField("title"))
    ));
    assert!(app.state().todos.is_empty());
    assert!(app.state().history.is_empty());
}

#[test]
fn malformed_import_leaves_todos_unchanged() {
    let mut app = setup();
    add(&mut app, "Existing", Priority::Medium);

    let err = app
        .dispatch(Action::ImportTodos(r#"{"title": "not an array"}"#.into()))
        .unwrap_err();
    assert!(matches!(err, CoreError::Import(ImportError::NotAnArray)));

    let err = app
        .dispatch(Action::ImportTodos(r#"[{"title": "no ids or dates"}]"#.into()))
        .unwrap_err();
    assert!(matches!(err, CoreError::Import(ImportError::InvalidItem { index: 0, .. })));
    assert_eq!(app.state().todos.len(), 1);
}

#[test]
fn export_then_import_appends_with_fresh_ids() {
    let mut app = setup();
    add(&mut app, "One", Priority::Low);
    add(&mut app, "Two", Priority::High);
    let exported = app.state().todos.export_json().unwrap();

    let out = app.dispatch(Action::ImportTodos(exported)).unwrap();
    let Some(Event::TasksImported { ids, .. }) = out.events.first() else {
        panic!("expected an import event");
    };
    assert_eq!(ids.len(), 2);
    assert_eq!(app.state().todos.len(), 4);
    let mut all: Vec<_> = app.state().todos.iter().map(|t| t.id.clone()).collect();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 4);
}

#[test]
fn clear_completed_logs_bulk_delete() {
    let mut app = setup();
    let done = add(&mut app, "Done", Priority::Low);
    add(&mut app, "Pending", Priority::Low);
    app.dispatch(Action::ToggleTodo(done)).unwrap();
    app.dispatch(Action::ClearCompleted).unwrap();
    assert_eq!(app.state().todos.len(), 1);
    assert_eq!(app.state().todos.filter(TodoFilter::Completed, now()).len(), 0);
    assert_eq!(app.state().history.count(HistoryAction::BulkDelete), 1);
}

#[test]
fn redemption_requires_enough_coins() {
    let mut app = setup();
    let err = app.dispatch(Action::Redeem(3)).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Ledger(LedgerError::InsufficientCoins {
            needed: 25,
            available: 0
        })
    ));

    for title in ["a", "b"] {
        let id = add(&mut app, title, Priority::High);
        app.dispatch(Action::ToggleTodo(id)).unwrap();
    }
    assert_eq!(app.state().ledger.coins(), 30);
    app.dispatch(Action::Redeem(3)).unwrap();
    assert_eq!(app.state().ledger.coins(), 5);
    assert_eq!(app.state().coupons.len(), 1);
    assert_eq!(app.state().coupons[0].name, "Snack Time");
    assert_eq!(app.state().history.count(HistoryAction::CouponRedeemed), 1);
}

#[test]
fn unknown_reward_is_rejected() {
    let mut app = setup();
    assert!(matches!(
        app.dispatch(Action::Redeem(99)),
        Err(CoreError::Ledger(LedgerError::UnknownReward(99)))
    ));
}

#[test]
fn unknown_task_id_is_not_found() {
    let mut app = setup();
    assert!(matches!(
        app.dispatch(Action::ToggleTodo("nope".into())),
        Err(CoreError::NotFound { kind: "task", .. })
    ));
}
