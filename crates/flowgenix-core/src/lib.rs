//! # FlowGenix Core Library
//!
//! Business logic for FlowGenix, a themed focus timer with a coin economy.
//! Every rule lives here; front ends only drive time, render state and
//! provide device capabilities.
//!
//! ## Architecture
//!
//! - **Focus session**: a countdown state machine advanced by the caller's
//!   one-second `tick`
//! - **Ledger**: coins, streaks, the rewards catalogue and coupons
//! - **Todos / Calendar**: collections whose due times drive reminders
//! - **Deferred queue**: cancellable one-shot timers for reminders and
//!   camera focus checks
//! - **Effects**: pure transition → effect mapping plus a best-effort
//!   dispatcher over injectable capabilities
//! - **Storage**: SQLite key-value store and TOML configuration
//!
//! ## Key Components
//!
//! - [`App`]: application state with a single `dispatch` entry point
//! - [`FocusSession`]: focus countdown state machine
//! - [`Store`]: collection persistence
//! - [`Config`]: environment configuration
//! - [`AppBlocker`]: client trait for the external app-blocker service

pub mod app;
pub mod blocker;
pub mod calendar;
pub mod camera;
pub mod chatbot;
pub mod clock;
pub mod deferred;
pub mod effects;
pub mod error;
pub mod events;
pub mod history;
pub mod ledger;
pub mod reminder;
pub mod settings;
pub mod storage;
pub mod timer;
pub mod todo;

pub use app::{Action, App, AppState, Outcome};
pub use blocker::{AppBlocker, BlockerBridge, BlockerCommand, BlockerStatus, HttpAppBlocker};
pub use calendar::{Calendar, CalendarEvent, EventDraft};
pub use clock::{Clock, ManualClock, SystemClock};
pub use effects::{Capabilities, Effect, Notice, Severity};
pub use error::{CoreError, Result, ValidationError};
pub use events::Event;
pub use history::{HistoryAction, HistoryEntry};
pub use ledger::{Coupon, Ledger, Reward, REWARDS};
pub use settings::{Settings, UserProfile};
pub use storage::{data_dir, Config, Store, StoreKey};
pub use timer::{FocusSession, SessionState, Theme};
pub use todo::{Priority, Todo, TodoDraft, TodoFilter};
