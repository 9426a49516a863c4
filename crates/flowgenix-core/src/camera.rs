//! Camera focus checks during a running session.
//!
//! A check is armed at a random offset inside the configured window. When it
//! fires the camera is acquired; a granted stream counts as verified and is
//! released straight away. There is no image analysis.

use chrono::{Duration, NaiveDateTime};
use rand::Rng;

use crate::deferred::{DeferredQueue, TimerHandle};
use crate::effects::{CapabilityOutcome, Notice};
use crate::history::HistoryAction;
use crate::storage::CameraConfig;

/// Random offset for the next check, uniform over the configured window.
pub fn next_check_offset(cfg: &CameraConfig, rng: &mut impl Rng) -> Duration {
    let min = i64::from(cfg.min_interval_min.max(1)) * 60;
    let max = (i64::from(cfg.max_interval_min) * 60).max(min);
    Duration::seconds(rng.gen_range(min..=max))
}

/// Holds at most one pending focus check.
#[derive(Debug, Default)]
pub struct FocusCheckScheduler {
    pending: Option<TimerHandle>,
}

impl FocusCheckScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the next check, replacing any pending one.
    pub fn arm<T>(
        &mut self,
        queue: &mut DeferredQueue<T>,
        cfg: &CameraConfig,
        now: NaiveDateTime,
        rng: &mut impl Rng,
        payload: T,
    ) -> NaiveDateTime {
        self.disarm(queue);
        let at = now + next_check_offset(cfg, rng);
        self.pending = Some(queue.schedule(at, payload));
        tracing::debug!(%at, "focus check armed");
        at
    }

    pub fn disarm<T>(&mut self, queue: &mut DeferredQueue<T>) -> bool {
        match self.pending.take() {
            Some(handle) => queue.cancel(handle),
            None => false,
        }
    }

    /// True when `handle` is the live check. Clears it if so.
    pub fn take_if_current(&mut self, handle: TimerHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}

/// What a fired check amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckVerdict {
    pub verified: bool,
    pub action: HistoryAction,
    pub description: &'static str,
    pub notice: Option<Notice>,
}

pub fn verdict(outcome: CapabilityOutcome) -> CheckVerdict {
    match outcome {
        CapabilityOutcome::Granted => CheckVerdict {
            verified: true,
            action: HistoryAction::FocusVerified,
            description: "Camera focus check passed",
            notice: None,
        },
        CapabilityOutcome::Denied => CheckVerdict {
            verified: false,
            action: HistoryAction::FocusSkipped,
            description: "Camera access denied; focus check skipped",
            notice: Some(Notice::warning("Camera access denied. Focus check skipped.")),
        },
        CapabilityOutcome::Unavailable => CheckVerdict {
            verified: false,
            action: HistoryAction::FocusSkipped,
            description: "No camera available; focus check skipped",
            notice: Some(Notice::warning("No camera available. Focus check skipped.")),
        },
    }
}
