//! Append-only activity logs.
//!
//! Both the history and the distraction log keep the newest entry first and
//! hold at most [`LOG_CAPACITY`] entries; inserting past the cap evicts the
//! oldest.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

pub const LOG_CAPACITY: usize = 100;

/// Bounded newest-first log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CappedLog<T> {
    entries: VecDeque<T>,
}

impl<T> CappedLog<T> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    pub fn push(&mut self, entry: T) {
        self.entries.push_front(entry);
        self.entries.truncate(LOG_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// Trim a log that was persisted by an older build without the cap.
    pub fn enforce_capacity(&mut self) {
        self.entries.truncate(LOG_CAPACITY);
    }
}

impl<T> Default for CappedLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    TimerStart,
    TimerPause,
    TimerResume,
    TimerReset,
    TimerComplete,
    AppsBlocked,
    AppsUnblocked,
    FocusVerified,
    FocusSkipped,
    TaskAdded,
    TaskUpdated,
    TaskCompleted,
    TaskUncompleted,
    TaskDeleted,
    BulkDelete,
    TasksImported,
    ReminderSent,
    EventAdded,
    EventDeleted,
    CouponRedeemed,
    DistractionLogged,
    SettingsChanged,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::TimerStart => "timer_start",
            HistoryAction::TimerPause => "timer_pause",
            HistoryAction::TimerResume => "timer_resume",
            HistoryAction::TimerReset => "timer_reset",
            HistoryAction::TimerComplete => "timer_complete",
            HistoryAction::AppsBlocked => "apps_blocked",
            HistoryAction::AppsUnblocked => "apps_unblocked",
            HistoryAction::FocusVerified => "focus_verified",
            HistoryAction::FocusSkipped => "focus_skipped",
            HistoryAction::TaskAdded => "task_added",
            HistoryAction::TaskUpdated => "task_updated",
            HistoryAction::TaskCompleted => "task_completed",
            HistoryAction::TaskUncompleted => "task_uncompleted",
            HistoryAction::TaskDeleted => "task_deleted",
            HistoryAction::BulkDelete => "bulk_delete",
            HistoryAction::TasksImported => "tasks_imported",
            HistoryAction::ReminderSent => "reminder_sent",
            HistoryAction::EventAdded => "event_added",
            HistoryAction::EventDeleted => "event_deleted",
            HistoryAction::CouponRedeemed => "coupon_redeemed",
            HistoryAction::DistractionLogged => "distraction_logged",
            HistoryAction::SettingsChanged => "settings_changed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub action: HistoryAction,
    pub description: String,
    pub timestamp: NaiveDateTime,
}

impl HistoryEntry {
    pub fn new(action: HistoryAction, description: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            action,
            description: description.into(),
            timestamp,
        }
    }
}

pub type HistoryLog = CappedLog<HistoryEntry>;

impl CappedLog<HistoryEntry> {
    pub fn record(&mut self, action: HistoryAction, description: impl Into<String>, at: NaiveDateTime) {
        self.push(HistoryEntry::new(action, description, at));
    }

    pub fn count(&self, action: HistoryAction) -> usize {
        self.iter().filter(|e| e.action == action).count()
    }
}

/// A moment where the user left the focus context mid-session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distraction {
    pub id: String,
    pub kind: String,
    pub description: String,
    pub timestamp: NaiveDateTime,
    /// Start of the session the distraction interrupted.
    #[serde(default)]
    pub session_started_at: Option<NaiveDateTime>,
}

pub type DistractionLog = CappedLog<Distraction>;
