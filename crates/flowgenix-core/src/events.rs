use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::reminder::ReminderKind;
use crate::timer::{SessionState, Theme};

/// Every state change in the system produces an Event.
/// Front ends render from them; the dispatcher maps them to effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    DurationSet {
        minutes: u32,
        at: NaiveDateTime,
    },
    TimerStarted {
        duration_minutes: u32,
        theme: Theme,
        at: NaiveDateTime,
    },
    TimerPaused {
        time_left_secs: u64,
        at: NaiveDateTime,
    },
    TimerResumed {
        time_left_secs: u64,
        at: NaiveDateTime,
    },
    /// Countdown reached zero. Emitted once per session.
    TimerCompleted {
        duration_minutes: u32,
        at: NaiveDateTime,
    },
    TimerReset {
        elapsed_secs: u64,
        at: NaiveDateTime,
    },
    /// Rewards for a completed session were credited.
    SessionRewarded {
        duration_minutes: u32,
        coins_earned: u64,
        balance: u64,
        streak_days: u32,
        at: NaiveDateTime,
    },
    TaskAdded {
        id: String,
        title: String,
        at: NaiveDateTime,
    },
    TaskUpdated {
        id: String,
        at: NaiveDateTime,
    },
    TaskDeleted {
        id: String,
        at: NaiveDateTime,
    },
    CompletedCleared {
        count: usize,
        at: NaiveDateTime,
    },
    TasksImported {
        ids: Vec<String>,
        at: NaiveDateTime,
    },
    TaskCompleted {
        id: String,
        coins_earned: u64,
        at: NaiveDateTime,
    },
    TaskReopened {
        id: String,
        at: NaiveDateTime,
    },
    CalendarEventAdded {
        id: String,
        title: String,
        at: NaiveDateTime,
    },
    CalendarEventDeleted {
        id: String,
        at: NaiveDateTime,
    },
    CouponRedeemed {
        coupon_id: String,
        reward_name: String,
        cost: u64,
        balance: u64,
        at: NaiveDateTime,
    },
    ReminderFired {
        target_id: String,
        title: String,
        kind: ReminderKind,
        at: NaiveDateTime,
    },
    FocusChecked {
        verified: bool,
        at: NaiveDateTime,
    },
    DistractionLogged {
        kind: String,
        at: NaiveDateTime,
    },
    SettingChanged {
        key: String,
        value: String,
        at: NaiveDateTime,
    },
    ProfileUpdated {
        display_name: String,
        at: NaiveDateTime,
    },
    AssistantReplied {
        text: String,
        at: NaiveDateTime,
    },
    /// The app blocker acknowledged a start or stop.
    AppsBlocked {
        at: NaiveDateTime,
    },
    AppsUnblocked {
        at: NaiveDateTime,
    },
    StateSnapshot {
        state: SessionState,
        duration_minutes: u32,
        time_left_secs: u64,
        theme: Theme,
        progress_pct: f64,
        at: NaiveDateTime,
    },
}
