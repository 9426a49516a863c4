//! Reminder planning for todos and calendar events.
//!
//! A due time yields up to three candidate instants:
//! - 09:00 on the due day, when the due time is at or after noon
//! - 20:00 the evening before, when the due time is before noon
//! - one hour before the due time
//!
//! Only candidates strictly after "now" are kept. Scheduling handles are
//! tracked per target so an edit replaces, rather than duplicates, the
//! previous reminders.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::deferred::{DeferredQueue, TimerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    MorningOf,
    EveningBefore,
    HourBefore,
}

impl ReminderKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReminderKind::MorningOf => "morning of",
            ReminderKind::EveningBefore => "evening before",
            ReminderKind::HourBefore => "hour before",
        }
    }
}

/// What a reminder points at. Resolved again when it fires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ReminderTarget {
    Todo(String),
    Event(String),
}

impl ReminderTarget {
    pub fn id(&self) -> &str {
        match self {
            ReminderTarget::Todo(id) | ReminderTarget::Event(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReminderCandidate {
    pub kind: ReminderKind,
    pub at: NaiveDateTime,
}

fn morning() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn evening() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Future reminder instants for something due at `due`, in firing order.
pub fn reminder_candidates(due: NaiveDateTime, now: NaiveDateTime) -> Vec<ReminderCandidate> {
    let mut out = Vec::with_capacity(2);

    if due.time() >= noon() {
        out.push(ReminderCandidate {
            kind: ReminderKind::MorningOf,
            at: due.date().and_time(morning()),
        });
    } else if let Some(prev) = due.date().pred_opt() {
        out.push(ReminderCandidate {
            kind: ReminderKind::EveningBefore,
            at: prev.and_time(evening()),
        });
    }

    out.push(ReminderCandidate {
        kind: ReminderKind::HourBefore,
        at: due - Duration::hours(1),
    });

    out.retain(|c| c.at > now);
    out.sort_by_key(|c| c.at);
    out
}

/// Payload carried by a scheduled reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReminder {
    pub target: ReminderTarget,
    pub kind: ReminderKind,
}

/// Per-target bookkeeping of scheduled reminder handles.
#[derive(Debug, Default)]
pub struct ReminderBook {
    handles: HashMap<ReminderTarget, Vec<TimerHandle>>,
}

impl ReminderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever was scheduled for `target` with fresh reminders.
    /// Returns the number of reminders now pending for it.
    pub fn schedule<T>(
        &mut self,
        queue: &mut DeferredQueue<T>,
        target: ReminderTarget,
        due: NaiveDateTime,
        now: NaiveDateTime,
        wrap: impl Fn(ScheduledReminder) -> T,
    ) -> usize {
        self.cancel(queue, &target);
        let handles: Vec<TimerHandle> = reminder_candidates(due, now)
            .into_iter()
            .map(|c| {
                queue.schedule(
                    c.at,
                    wrap(ScheduledReminder {
                        target: target.clone(),
                        kind: c.kind,
                    }),
                )
            })
            .collect();
        let count = handles.len();
        if count > 0 {
            tracing::debug!(target_id = target.id(), count, "scheduled reminders");
            self.handles.insert(target, handles);
        }
        count
    }

    /// Cancel every pending reminder for `target`. Returns how many were live.
    pub fn cancel<T>(&mut self, queue: &mut DeferredQueue<T>, target: &ReminderTarget) -> usize {
        self.handles
            .remove(target)
            .map(|handles| handles.into_iter().filter(|h| queue.cancel(*h)).count())
            .unwrap_or(0)
    }

    /// Forget a handle that has fired.
    pub fn fired(&mut self, target: &ReminderTarget, handle: TimerHandle) {
        if let Some(handles) = self.handles.get_mut(target) {
            handles.retain(|h| *h != handle);
            if handles.is_empty() {
                self.handles.remove(target);
            }
        }
    }

    pub fn pending_for(&self, target: &ReminderTarget) -> usize {
        self.handles.get(target).map(Vec::len).unwrap_or(0)
    }
}
