//! Application state and the single dispatch entry point.
//!
//! [`App`] owns every collection, the focus session and the deferred queue.
//! Front ends send it [`Action`]s; each dispatch mutates state, persists the
//! touched collections, runs side effects and reports what happened as an
//! [`Outcome`]. Talking to the app blocker is left to the caller, which
//! receives a [`BlockerCommand`] to carry out asynchronously.

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::blocker::{BlockerCommand, BridgeOutcome};
use crate::calendar::{Calendar, EventDraft};
use crate::camera::{self, FocusCheckScheduler};
use crate::chatbot::Transcript;
use crate::clock::{Clock, SystemClock};
use crate::deferred::{DeferredQueue, TimerHandle};
use crate::effects::{
    effects_for, Capabilities, DispatchLog, Effect, EffectDispatcher, Transition,
};
use crate::error::{CoreError, Result, TimerError, ValidationError};
use crate::events::Event;
use crate::history::{Distraction, DistractionLog, HistoryAction, HistoryLog};
use crate::ledger::{find_reward, Coupon, Ledger};
use crate::reminder::{ReminderBook, ReminderTarget, ScheduledReminder};
use crate::settings::{Settings, UserProfile};
use crate::storage::{Config, Store, StoreKey};
use crate::timer::{completion_reward, FocusSession, SessionState, Theme};
use crate::todo::{TodoDraft, TodoList, Toggle};

/// Everything the user sees.
#[derive(Debug, Default)]
pub struct AppState {
    pub session: FocusSession,
    pub ledger: Ledger,
    pub todos: TodoList,
    pub calendar: Calendar,
    pub history: HistoryLog,
    pub distractions: DistractionLog,
    pub settings: Settings,
    pub coupons: Vec<Coupon>,
    pub user: Option<UserProfile>,
    pub transcript: Transcript,
}

#[derive(Debug, Clone)]
pub enum Action {
    SetDuration(u32),
    SetTheme(Theme),
    StartSession,
    PauseSession,
    ResumeSession,
    /// Abandon the session. Needs `confirmed` once any time has elapsed.
    ResetSession { confirmed: bool },
    /// One second of wall time has passed. Also fires due deferred work.
    Tick,
    /// Fire due deferred work without advancing the countdown.
    Poll,
    AddTodo(TodoDraft),
    EditTodo { id: String, draft: TodoDraft },
    ToggleTodo(String),
    DeleteTodo(String),
    ClearCompleted,
    ImportTodos(String),
    AddEvent(EventDraft),
    DeleteEvent(String),
    Redeem(u32),
    LogDistraction { kind: String, description: String },
    UpdateSetting { key: String, value: String },
    SetProfile { display_name: String },
    Chat(String),
    /// Result of a blocker command the caller carried out.
    BlockerApplied(BridgeOutcome),
}

/// What a dispatch produced.
#[derive(Debug, Default)]
pub struct Outcome {
    pub events: Vec<Event>,
    pub blocker: Option<BlockerCommand>,
    pub effects: DispatchLog,
}

#[derive(Debug, Clone, PartialEq)]
enum Deferred {
    Reminder(ScheduledReminder),
    FocusCheck,
}

pub struct App {
    state: AppState,
    store: Store,
    config: Config,
    clock: Box<dyn Clock>,
    dispatcher: EffectDispatcher,
    queue: DeferredQueue<Deferred>,
    reminders: ReminderBook,
    focus_checks: FocusCheckScheduler,
    rng: StdRng,
}

impl App {
    /// Open the on-disk store and run on the system clock.
    pub fn open(config: Config, caps: Capabilities) -> Result<Self> {
        let store = Store::open()?;
        Self::with_parts(store, config, caps, Box::new(SystemClock))
    }

    pub fn with_parts(
        store: Store,
        config: Config,
        caps: Capabilities,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        let settings: Settings = store.load(StoreKey::Settings)?;
        let mut history: HistoryLog = store.load(StoreKey::History)?;
        let mut distractions: DistractionLog = store.load(StoreKey::Distractions)?;
        history.enforce_capacity();
        distractions.enforce_capacity();
        let state = AppState {
            session: FocusSession::new(settings.default_minutes, settings.theme),
            ledger: store.load(StoreKey::Stats)?,
            todos: store.load(StoreKey::Todos)?,
            calendar: store.load(StoreKey::Calendar)?,
            history,
            distractions,
            coupons: store.load(StoreKey::Coupons)?,
            user: store.load(StoreKey::User)?,
            transcript: Transcript::new(),
            settings,
        };

        let mut app = Self {
            state,
            store,
            config,
            clock,
            dispatcher: EffectDispatcher::new(caps),
            queue: DeferredQueue::new(),
            reminders: ReminderBook::new(),
            focus_checks: FocusCheckScheduler::new(),
            rng: StdRng::from_entropy(),
        };
        app.schedule_all_reminders();
        Ok(app)
    }

    /// Make focus-check timing reproducible.
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Earliest pending deferred item.
    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        self.queue.next_deadline()
    }

    /// Pending reminders in firing order.
    pub fn pending_reminders(&self) -> Vec<(NaiveDateTime, &ScheduledReminder)> {
        self.queue
            .pending()
            .filter_map(|(at, item)| match item {
                Deferred::Reminder(r) => Some((at, r)),
                Deferred::FocusCheck => None,
            })
            .collect()
    }

    pub fn focus_check_armed(&self) -> bool {
        self.focus_checks.is_armed()
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Outcome> {
        let now = self.clock.now();
        let mut out = Outcome::default();
        match action {
            Action::SetDuration(minutes) => {
                if minutes == 0 {
                    return Err(ValidationError::InvalidValue {
                        field: "duration".into(),
                        message: "must be at least one minute".into(),
                    }
                    .into());
                }
                out.events.push(self.state.session.set_duration(minutes, now)?);
            }
            Action::SetTheme(theme) => {
                if self.state.session.state() != SessionState::Idle {
                    return Err(ValidationError::SessionActive.into());
                }
                self.state.session.set_theme(theme);
            }
            Action::StartSession => self.start_session(now, &mut out)?,
            Action::PauseSession => self.pause_session(now, &mut out)?,
            Action::ResumeSession => self.resume_session(now, &mut out)?,
            Action::ResetSession { confirmed } => self.reset_session(confirmed, now, &mut out)?,
            Action::Tick => {
                if let Some(event) = self.state.session.tick(now) {
                    out.events.push(event);
                    self.complete_session(now, &mut out)?;
                }
                self.run_due(now, &mut out)?;
            }
            Action::Poll => self.run_due(now, &mut out)?,
            Action::AddTodo(draft) => {
                let todo = self.state.todos.add(draft, now)?;
                let (id, title, due) = (todo.id.clone(), todo.title.clone(), todo.due_at);
                self.schedule_reminders(ReminderTarget::Todo(id.clone()), due, now);
                self.state
                    .history
                    .record(HistoryAction::TaskAdded, format!("Added task: {title}"), now);
                out.events.push(Event::TaskAdded { id, title, at: now });
                self.persist(&[StoreKey::Todos, StoreKey::History])?;
            }
            Action::EditTodo { id, draft } => {
                let todo = self
                    .state
                    .todos
                    .update(&id, draft)?
                    .ok_or_else(|| not_found("task", &id))?;
                let (title, due, completed) = (todo.title.clone(), todo.due_at, todo.completed);
                let target = ReminderTarget::Todo(id.clone());
                if completed {
                    self.reminders.cancel(&mut self.queue, &target);
                } else {
                    self.schedule_reminders(target, due, now);
                }
                self.state
                    .history
                    .record(HistoryAction::TaskUpdated, format!("Updated task: {title}"), now);
                out.events.push(Event::TaskUpdated { id, at: now });
                self.persist(&[StoreKey::Todos, StoreKey::History])?;
            }
            Action::ToggleTodo(id) => self.toggle_todo(id, now, &mut out)?,
            Action::DeleteTodo(id) => {
                let todo = self
                    .state
                    .todos
                    .remove(&id)
                    .ok_or_else(|| not_found("task", &id))?;
                self.reminders
                    .cancel(&mut self.queue, &ReminderTarget::Todo(id.clone()));
                self.state.history.record(
                    HistoryAction::TaskDeleted,
                    format!("Deleted task: {}", todo.title),
                    now,
                );
                out.events.push(Event::TaskDeleted { id, at: now });
                self.persist(&[StoreKey::Todos, StoreKey::History])?;
            }
            Action::ClearCompleted => {
                let removed = self.state.todos.clear_completed();
                for todo in &removed {
                    self.reminders
                        .cancel(&mut self.queue, &ReminderTarget::Todo(todo.id.clone()));
                }
                if !removed.is_empty() {
                    self.state.history.record(
                        HistoryAction::BulkDelete,
                        format!("Cleared {} completed tasks", removed.len()),
                        now,
                    );
                    self.persist(&[StoreKey::Todos, StoreKey::History])?;
                }
                out.events.push(Event::CompletedCleared {
                    count: removed.len(),
                    at: now,
                });
            }
            Action::ImportTodos(json) => {
                let ids = self.state.todos.import_json(&json)?;
                for id in &ids {
                    let due = self
                        .state
                        .todos
                        .get(id)
                        .filter(|t| !t.completed)
                        .map(|t| t.due_at);
                    if let Some(due) = due {
                        self.schedule_reminders(ReminderTarget::Todo(id.clone()), due, now);
                    }
                }
                self.state.history.record(
                    HistoryAction::TasksImported,
                    format!("Imported {} tasks", ids.len()),
                    now,
                );
                out.events.push(Event::TasksImported { ids, at: now });
                self.persist(&[StoreKey::Todos, StoreKey::History])?;
            }
            Action::AddEvent(draft) => {
                let event = self.state.calendar.add(draft)?;
                let (id, title) = (event.id.clone(), event.title.clone());
                let due = event.reminder_enabled.then(|| event.starts_at());
                if let Some(due) = due {
                    self.schedule_reminders(ReminderTarget::Event(id.clone()), due, now);
                }
                self.state
                    .history
                    .record(HistoryAction::EventAdded, format!("Added event: {title}"), now);
                out.events.push(Event::CalendarEventAdded { id, title, at: now });
                self.persist(&[StoreKey::Calendar, StoreKey::History])?;
            }
            Action::DeleteEvent(id) => {
                let event = self
                    .state
                    .calendar
                    .remove(&id)
                    .ok_or_else(|| not_found("event", &id))?;
                self.reminders
                    .cancel(&mut self.queue, &ReminderTarget::Event(id.clone()));
                self.state.history.record(
                    HistoryAction::EventDeleted,
                    format!("Deleted event: {}", event.title),
                    now,
                );
                out.events.push(Event::CalendarEventDeleted { id, at: now });
                self.persist(&[StoreKey::Calendar, StoreKey::History])?;
            }
            Action::Redeem(reward_id) => {
                let reward = find_reward(reward_id)?;
                let coupon = self.state.ledger.redeem(reward, now)?;
                self.state.history.record(
                    HistoryAction::CouponRedeemed,
                    format!("Redeemed {} for {} coins", reward.name, reward.cost),
                    now,
                );
                out.events.push(Event::CouponRedeemed {
                    coupon_id: coupon.id.clone(),
                    reward_name: coupon.name.clone(),
                    cost: coupon.cost,
                    balance: self.state.ledger.coins(),
                    at: now,
                });
                self.state.coupons.push(coupon);
                self.fire(
                    &Transition::CouponRedeemed {
                        reward: reward.name.to_string(),
                        cost: reward.cost,
                    },
                    now,
                    &mut out,
                );
                self.persist(&[StoreKey::Stats, StoreKey::Coupons, StoreKey::History])?;
            }
            Action::LogDistraction { kind, description } => {
                if !self.state.session.is_active() {
                    tracing::debug!(%kind, "distraction ignored outside a session");
                    return Ok(out);
                }
                self.state.distractions.push(Distraction {
                    id: Uuid::new_v4().to_string(),
                    kind: kind.clone(),
                    description: description.clone(),
                    timestamp: now,
                    session_started_at: self.state.session.started_at(),
                });
                self.state.history.record(
                    HistoryAction::DistractionLogged,
                    format!("Distraction ({kind}): {description}"),
                    now,
                );
                out.events.push(Event::DistractionLogged { kind, at: now });
                self.persist(&[StoreKey::Distractions, StoreKey::History])?;
            }
            Action::UpdateSetting { key, value } => self.update_setting(key, value, now, &mut out)?,
            Action::SetProfile { display_name } => {
                let display_name = display_name.trim().to_string();
                if display_name.is_empty() {
                    return Err(ValidationError::MissingField("display name").into());
                }
                let created_at = self.state.user.as_ref().map_or(now, |u| u.created_at);
                self.state.user = Some(UserProfile {
                    display_name: display_name.clone(),
                    created_at,
                });
                out.events.push(Event::ProfileUpdated {
                    display_name,
                    at: now,
                });
                self.persist(&[StoreKey::User])?;
            }
            Action::Chat(text) => {
                if text.trim().is_empty() {
                    return Err(ValidationError::MissingField("message").into());
                }
                let coins = self.state.ledger.coins();
                let reply = self.state.transcript.ask(text.trim(), coins, now);
                out.events.push(Event::AssistantReplied {
                    text: reply.text.clone(),
                    at: now,
                });
            }
            Action::BlockerApplied(result) => {
                if result.applied {
                    let (action, description, event) = match result.command {
                        BlockerCommand::Start { minutes } => (
                            HistoryAction::AppsBlocked,
                            format!("Blocked distracting apps for {minutes} minutes"),
                            Event::AppsBlocked { at: now },
                        ),
                        BlockerCommand::Stop => (
                            HistoryAction::AppsUnblocked,
                            "Unblocked apps".to_string(),
                            Event::AppsUnblocked { at: now },
                        ),
                    };
                    self.state.history.record(action, description, now);
                    out.events.push(event);
                    self.persist(&[StoreKey::History])?;
                }
                if let Some(notice) = result.notice {
                    out.effects
                        .extend(self.dispatcher.dispatch(vec![Effect::Toast(notice)], now));
                }
            }
        }
        Ok(out)
    }

    // ── Session ──────────────────────────────────────────────────────

    fn start_session(&mut self, now: NaiveDateTime, out: &mut Outcome) -> Result<()> {
        let event = self.state.session.start(now)?;
        let minutes = self.state.session.duration_minutes();
        let theme = self.state.session.theme();
        self.state.history.record(
            HistoryAction::TimerStart,
            format!("Started {minutes}-minute {} session", theme.title()),
            now,
        );
        out.events.push(event);
        self.fire(&Transition::SessionStarted { theme, minutes }, now, out);
        if self.state.settings.camera_check {
            self.arm_focus_check(now);
        }
        if self.state.settings.app_blocking {
            out.blocker = Some(BlockerCommand::Start { minutes });
        }
        tracing::debug!(minutes, %theme, "session started");
        self.persist(&[StoreKey::History])?;
        Ok(())
    }

    fn pause_session(&mut self, now: NaiveDateTime, out: &mut Outcome) -> Result<()> {
        let event = self.state.session.pause(now)?;
        self.focus_checks.disarm(&mut self.queue);
        self.state.history.record(
            HistoryAction::TimerPause,
            format!(
                "Paused with {} left",
                format_secs(self.state.session.time_left_secs())
            ),
            now,
        );
        out.events.push(event);
        self.fire(&Transition::SessionPaused, now, out);
        self.persist(&[StoreKey::History])?;
        Ok(())
    }

    fn resume_session(&mut self, now: NaiveDateTime, out: &mut Outcome) -> Result<()> {
        let event = self.state.session.resume(now)?;
        self.state.history.record(
            HistoryAction::TimerResume,
            format!(
                "Resumed with {} left",
                format_secs(self.state.session.time_left_secs())
            ),
            now,
        );
        out.events.push(event);
        let theme = self.state.session.theme();
        self.fire(&Transition::SessionResumed { theme }, now, out);
        if self.state.settings.camera_check {
            self.arm_focus_check(now);
        }
        self.persist(&[StoreKey::History])?;
        Ok(())
    }

    fn reset_session(&mut self, confirmed: bool, now: NaiveDateTime, out: &mut Outcome) -> Result<()> {
        if !self.state.session.is_active() {
            return Err(TimerError::InvalidTransition {
                action: "reset",
                state: self.state.session.state(),
            }
            .into());
        }
        let elapsed_secs = self.state.session.elapsed_secs();
        if elapsed_secs > 0 && !confirmed {
            return Err(CoreError::ConfirmationRequired { elapsed_secs });
        }
        let event = self.state.session.reset(now)?;
        self.focus_checks.disarm(&mut self.queue);
        self.state.history.record(
            HistoryAction::TimerReset,
            format!("Reset after {} minutes", elapsed_secs / 60),
            now,
        );
        out.events.push(event);
        self.fire(&Transition::SessionReset { elapsed_secs }, now, out);
        out.blocker = Some(BlockerCommand::Stop);
        self.persist(&[StoreKey::History])?;
        Ok(())
    }

    fn complete_session(&mut self, now: NaiveDateTime, out: &mut Outcome) -> Result<()> {
        let minutes = self.state.session.duration_minutes();
        let theme = self.state.session.theme();
        let coins = completion_reward(minutes);

        let balance = self.state.ledger.earn(coins);
        self.state.ledger.record_session(minutes, now.date());
        self.state.history.record(
            HistoryAction::TimerComplete,
            format!("Completed {minutes}-minute focus session (+{coins} coins)"),
            now,
        );
        self.focus_checks.disarm(&mut self.queue);
        out.events.push(Event::SessionRewarded {
            duration_minutes: minutes,
            coins_earned: coins,
            balance,
            streak_days: self.state.ledger.streak_days,
            at: now,
        });
        self.fire(
            &Transition::SessionCompleted {
                minutes,
                coins,
                theme,
            },
            now,
            out,
        );
        out.blocker = Some(BlockerCommand::Stop);
        self.state.session.finish();
        tracing::info!(minutes, coins, balance, "focus session completed");
        self.persist(&[StoreKey::Stats, StoreKey::History])?;
        Ok(())
    }

    fn arm_focus_check(&mut self, now: NaiveDateTime) {
        self.focus_checks.arm(
            &mut self.queue,
            &self.config.camera,
            now,
            &mut self.rng,
            Deferred::FocusCheck,
        );
    }

    fn run_focus_check(&mut self, handle: TimerHandle, now: NaiveDateTime, out: &mut Outcome) -> Result<()> {
        if !self.focus_checks.take_if_current(handle)
            || self.state.session.state() != SessionState::Running
            || !self.state.settings.camera_check
        {
            return Ok(());
        }
        let (outcome, record) = self.dispatcher.dispatch_one(&Effect::AcquireCamera, now);
        out.effects.results.push(record);

        let verdict = camera::verdict(outcome);
        let mut follow_up = Vec::new();
        if verdict.verified {
            follow_up.push(Effect::ReleaseCamera);
        }
        if let Some(notice) = verdict.notice {
            follow_up.push(Effect::Toast(notice));
        }
        out.effects.extend(self.dispatcher.dispatch(follow_up, now));

        self.state
            .history
            .record(verdict.action, verdict.description, now);
        out.events.push(Event::FocusChecked {
            verified: verdict.verified,
            at: now,
        });
        self.arm_focus_check(now);
        self.persist(&[StoreKey::History])?;
        Ok(())
    }

    // ── Todos and reminders ──────────────────────────────────────────

    fn toggle_todo(&mut self, id: String, now: NaiveDateTime, out: &mut Outcome) -> Result<()> {
        let toggle = self
            .state
            .todos
            .toggle(&id, now)
            .ok_or_else(|| not_found("task", &id))?;
        let (title, due) = match self.state.todos.get(&id) {
            Some(todo) => (todo.title.clone(), todo.due_at),
            None => return Err(not_found("task", &id)),
        };
        let target = ReminderTarget::Todo(id.clone());
        match toggle {
            Toggle::Completed { coins } => {
                self.state.ledger.earn(coins);
                self.reminders.cancel(&mut self.queue, &target);
                self.state.history.record(
                    HistoryAction::TaskCompleted,
                    format!("Completed task: {title} (+{coins} coins)"),
                    now,
                );
                out.events.push(Event::TaskCompleted {
                    id,
                    coins_earned: coins,
                    at: now,
                });
                self.fire(&Transition::TaskCompleted { title, coins }, now, out);
            }
            Toggle::Reopened => {
                self.schedule_reminders(target, due, now);
                self.state.history.record(
                    HistoryAction::TaskUncompleted,
                    format!("Reopened task: {title}"),
                    now,
                );
                out.events.push(Event::TaskReopened { id, at: now });
                self.fire(&Transition::TaskReopened { title }, now, out);
            }
        }
        self.persist(&[StoreKey::Todos, StoreKey::Stats, StoreKey::History])
    }

    fn schedule_reminders(&mut self, target: ReminderTarget, due: NaiveDateTime, now: NaiveDateTime) {
        self.reminders
            .schedule(&mut self.queue, target, due, now, Deferred::Reminder);
    }

    fn schedule_all_reminders(&mut self) {
        let now = self.clock.now();
        let todos: Vec<_> = self
            .state
            .todos
            .iter()
            .filter(|t| !t.completed)
            .map(|t| (ReminderTarget::Todo(t.id.clone()), t.due_at))
            .collect();
        let events: Vec<_> = self
            .state
            .calendar
            .iter()
            .filter(|e| e.reminder_enabled)
            .map(|e| (ReminderTarget::Event(e.id.clone()), e.starts_at()))
            .collect();
        for (target, due) in todos.into_iter().chain(events) {
            self.schedule_reminders(target, due, now);
        }
    }

    /// Title of a reminder's target, if it still wants reminding.
    fn reminder_title(&self, target: &ReminderTarget) -> Option<String> {
        match target {
            ReminderTarget::Todo(id) => self
                .state
                .todos
                .get(id)
                .filter(|t| !t.completed)
                .map(|t| t.title.clone()),
            ReminderTarget::Event(id) => self
                .state
                .calendar
                .get(id)
                .filter(|e| e.reminder_enabled)
                .map(|e| e.title.clone()),
        }
    }

    fn fire_reminder(
        &mut self,
        handle: TimerHandle,
        reminder: ScheduledReminder,
        now: NaiveDateTime,
        out: &mut Outcome,
    ) -> Result<()> {
        self.reminders.fired(&reminder.target, handle);
        let Some(title) = self.reminder_title(&reminder.target) else {
            tracing::debug!(target_id = reminder.target.id(), "reminder target gone; skipping");
            return Ok(());
        };
        self.fire(
            &Transition::ReminderDue {
                title: title.clone(),
                kind: reminder.kind,
            },
            now,
            out,
        );
        self.state.history.record(
            HistoryAction::ReminderSent,
            format!("Reminder ({}): {title}", reminder.kind.label()),
            now,
        );
        out.events.push(Event::ReminderFired {
            target_id: reminder.target.id().to_string(),
            title,
            kind: reminder.kind,
            at: now,
        });
        tracing::info!(target_id = reminder.target.id(), kind = reminder.kind.label(), "reminder sent");
        self.persist(&[StoreKey::History])
    }

    /// Items are taken one at a time, so an error leaves the rest queued for
    /// the next poll.
    fn run_due(&mut self, now: NaiveDateTime, out: &mut Outcome) -> Result<()> {
        while let Some((handle, item)) = self.queue.pop_next_due(now) {
            match item {
                Deferred::Reminder(reminder) => self.fire_reminder(handle, reminder, now, out)?,
                Deferred::FocusCheck => self.run_focus_check(handle, now, out)?,
            }
        }
        Ok(())
    }

    // ── Settings ─────────────────────────────────────────────────────

    fn update_setting(
        &mut self,
        key: String,
        value: String,
        now: NaiveDateTime,
        out: &mut Outcome,
    ) -> Result<()> {
        let mut settings = self.state.settings.clone();
        settings
            .set(&key, &value)
            .map_err(|message| ValidationError::InvalidValue {
                field: key.clone(),
                message,
            })?;
        if key == "default_minutes" && settings.default_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: key,
                message: "must be at least one minute".into(),
            }
            .into());
        }

        let was_checking = self.state.settings.camera_check;
        self.state.settings = settings;
        if key == "theme" {
            self.state.session.set_theme(self.state.settings.theme);
        }
        if key == "default_minutes" && self.state.session.state() == SessionState::Idle {
            let minutes = self.state.settings.default_minutes;
            out.events.push(self.state.session.set_duration(minutes, now)?);
        }
        let checking = self.state.settings.camera_check;
        if checking != was_checking {
            if checking && self.state.session.state() == SessionState::Running {
                self.arm_focus_check(now);
            } else if !checking {
                self.focus_checks.disarm(&mut self.queue);
            }
        }

        let shown = self.state.settings.get(&key).unwrap_or(value);
        self.state.history.record(
            HistoryAction::SettingsChanged,
            format!("Set {key} to {shown}"),
            now,
        );
        out.events.push(Event::SettingChanged {
            key,
            value: shown,
            at: now,
        });
        self.persist(&[StoreKey::Settings, StoreKey::History])
    }

    // ── Plumbing ─────────────────────────────────────────────────────

    fn fire(&self, transition: &Transition, now: NaiveDateTime, out: &mut Outcome) {
        let effects = effects_for(transition, &self.state.settings);
        out.effects.extend(self.dispatcher.dispatch(effects, now));
    }

    fn persist(&self, keys: &[StoreKey]) -> Result<()> {
        for key in keys {
            match key {
                StoreKey::User => self.store.save(*key, &self.state.user)?,
                StoreKey::Stats => self.store.save(*key, &self.state.ledger)?,
                StoreKey::Todos => self.store.save(*key, &self.state.todos)?,
                StoreKey::Calendar => self.store.save(*key, &self.state.calendar)?,
                StoreKey::History => self.store.save(*key, &self.state.history)?,
                StoreKey::Distractions => self.store.save(*key, &self.state.distractions)?,
                StoreKey::Settings => self.store.save(*key, &self.state.settings)?,
                StoreKey::Coupons => self.store.save(*key, &self.state.coupons)?,
            }
        }
        Ok(())
    }
}

fn not_found(kind: &'static str, id: &str) -> CoreError {
    CoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}

/// `mm:ss`.
pub fn format_secs(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
