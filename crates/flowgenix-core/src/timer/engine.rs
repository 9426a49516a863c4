//! Focus-session state machine.
//!
//! The session is tick-driven: it has no thread and no clock of its own. The
//! caller invokes [`FocusSession::tick`] once per second while the session is
//! running. Wall-clock drift between ticks is not corrected.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused | Completed)
//! Paused -> Running
//! Running | Paused -> Idle      (reset)
//! Completed -> Idle             (finish, after reward processing)
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::theme::Theme;
use crate::error::{CoreError, TimerError, ValidationError};
use crate::events::Event;

/// Coins earned per full five minutes of completed focus.
pub const COINS_PER_FIVE_MINUTES: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    /// Countdown reached zero; rewards not yet processed.
    Completed,
}

/// Reward for a naturally completed session: `floor(minutes / 5) * 10`.
pub fn completion_reward(duration_minutes: u32) -> u64 {
    u64::from(duration_minutes / 5) * COINS_PER_FIVE_MINUTES
}

/// A single focus session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSession {
    state: SessionState,
    duration_minutes: u32,
    time_left_secs: u64,
    started_at: Option<NaiveDateTime>,
    theme: Theme,
}

impl FocusSession {
    /// Create an idle session with the given duration.
    pub fn new(duration_minutes: u32, theme: Theme) -> Self {
        Self {
            state: SessionState::Idle,
            duration_minutes,
            time_left_secs: full_secs(duration_minutes),
            started_at: None,
            theme,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn started_at(&self) -> Option<NaiveDateTime> {
        self.started_at
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Running or paused.
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Running | SessionState::Paused)
    }

    /// Seconds counted down so far in this session.
    pub fn elapsed_secs(&self) -> u64 {
        full_secs(self.duration_minutes).saturating_sub(self.time_left_secs)
    }

    /// 0.0 .. 100.0 progress through the session.
    pub fn progress_pct(&self) -> f64 {
        let total = full_secs(self.duration_minutes);
        if total == 0 {
            return 0.0;
        }
        (self.elapsed_secs() as f64 / total as f64 * 100.0).min(100.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, at: NaiveDateTime) -> Event {
        Event::StateSnapshot {
            state: self.state,
            duration_minutes: self.duration_minutes,
            time_left_secs: self.time_left_secs,
            theme: self.theme,
            progress_pct: self.progress_pct(),
            at,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Change the duration. Only allowed while idle.
    pub fn set_duration(&mut self, minutes: u32, at: NaiveDateTime) -> Result<Event, ValidationError> {
        if self.state != SessionState::Idle {
            return Err(ValidationError::SessionActive);
        }
        self.duration_minutes = minutes;
        self.time_left_secs = full_secs(minutes);
        Ok(Event::DurationSet { minutes, at })
    }

    /// Theme applies to the next session; the running one keeps its own.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.state == SessionState::Idle {
            self.theme = theme;
        }
    }

    pub fn start(&mut self, at: NaiveDateTime) -> Result<Event, CoreError> {
        if self.state != SessionState::Idle {
            return Err(TimerError::InvalidTransition {
                action: "start",
                state: self.state,
            }
            .into());
        }
        if self.duration_minutes == 0 {
            return Err(ValidationError::DurationNotSet.into());
        }
        self.state = SessionState::Running;
        self.time_left_secs = full_secs(self.duration_minutes);
        self.started_at = Some(at);
        Ok(Event::TimerStarted {
            duration_minutes: self.duration_minutes,
            theme: self.theme,
            at,
        })
    }

    pub fn pause(&mut self, at: NaiveDateTime) -> Result<Event, TimerError> {
        if self.state != SessionState::Running {
            return Err(TimerError::InvalidTransition {
                action: "pause",
                state: self.state,
            });
        }
        self.state = SessionState::Paused;
        Ok(Event::TimerPaused {
            time_left_secs: self.time_left_secs,
            at,
        })
    }

    pub fn resume(&mut self, at: NaiveDateTime) -> Result<Event, TimerError> {
        if self.state != SessionState::Paused {
            return Err(TimerError::InvalidTransition {
                action: "resume",
                state: self.state,
            });
        }
        self.state = SessionState::Running;
        Ok(Event::TimerResumed {
            time_left_secs: self.time_left_secs,
            at,
        })
    }

    /// Abandon the session. No reward; time left goes back to the full duration.
    pub fn reset(&mut self, at: NaiveDateTime) -> Result<Event, TimerError> {
        if !self.is_active() {
            return Err(TimerError::InvalidTransition {
                action: "reset",
                state: self.state,
            });
        }
        let elapsed_secs = self.elapsed_secs();
        self.restore_idle();
        Ok(Event::TimerReset { elapsed_secs, at })
    }

    /// Call once per second. Returns `Some(Event::TimerCompleted)` exactly
    /// once, on the tick that reaches zero.
    pub fn tick(&mut self, at: NaiveDateTime) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        self.time_left_secs = self.time_left_secs.saturating_sub(1);
        if self.time_left_secs == 0 {
            self.state = SessionState::Completed;
            return Some(Event::TimerCompleted {
                duration_minutes: self.duration_minutes,
                at,
            });
        }
        None
    }

    /// Leave `Completed` for `Idle` once rewards have been processed.
    /// Returns the started-at timestamp of the finished session.
    pub fn finish(&mut self) -> Option<NaiveDateTime> {
        if self.state != SessionState::Completed {
            return None;
        }
        let started = self.started_at;
        self.restore_idle();
        started
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn restore_idle(&mut self) {
        self.state = SessionState::Idle;
        self.time_left_secs = full_secs(self.duration_minutes);
        self.started_at = None;
    }
}

impl Default for FocusSession {
    fn default() -> Self {
        Self::new(25, Theme::default())
    }
}

fn full_secs(minutes: u32) -> u64 {
    u64::from(minutes) * 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn run_ticks(session: &mut FocusSession, n: u64) -> Vec<Event> {
        (0..n).filter_map(|_| session.tick(at())).collect()
    }

    #[test]
    fn start_pause_resume() {
        let mut session = FocusSession::new(25, Theme::Kpop);
        assert_eq!(session.state(), SessionState::Idle);

        session.start(at()).unwrap();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.started_at(), Some(at()));

        session.pause(at()).unwrap();
        assert_eq!(session.state(), SessionState::Paused);

        session.resume(at()).unwrap();
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn start_with_zero_duration_is_rejected() {
        let mut session = FocusSession::new(0, Theme::Kpop);
        let err = session.start(at()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::DurationNotSet)
        ));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn set_duration_only_while_idle() {
        let mut session = FocusSession::new(25, Theme::Kpop);
        session.set_duration(45, at()).unwrap();
        assert_eq!(session.time_left_secs(), 45 * 60);

        session.start(at()).unwrap();
        assert_eq!(
            session.set_duration(10, at()),
            Err(ValidationError::SessionActive)
        );
        assert_eq!(session.duration_minutes(), 45);
    }

    #[test]
    fn paused_session_does_not_count_down() {
        let mut session = FocusSession::new(5, Theme::Anime);
        session.start(at()).unwrap();
        run_ticks(&mut session, 30);
        session.pause(at()).unwrap();
        let before = session.time_left_secs();
        run_ticks(&mut session, 100);
        session.resume(at()).unwrap();
        assert_eq!(session.time_left_secs(), before);
        assert_eq!(before, 5 * 60 - 30);
    }

    #[test]
    fn completes_exactly_once() {
        let mut session = FocusSession::new(1, Theme::Car);
        session.start(at()).unwrap();
        let events = run_ticks(&mut session, 120);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Event::TimerCompleted {
                duration_minutes: 1,
                ..
            }
        ));
        assert_eq!(session.state(), SessionState::Completed);

        assert_eq!(session.finish(), Some(at()));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.time_left_secs(), 60);
        assert_eq!(session.finish(), None);
    }

    #[test]
    fn reset_restores_full_duration() {
        let mut session = FocusSession::new(25, Theme::Music);
        session.start(at()).unwrap();
        run_ticks(&mut session, 90);
        match session.reset(at()).unwrap() {
            Event::TimerReset { elapsed_secs, .. } => assert_eq!(elapsed_secs, 90),
            other => panic!("expected TimerReset, got {other:?}"),
        }
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.time_left_secs(), 25 * 60);
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let mut session = FocusSession::default();
        assert!(session.pause(at()).is_err());
        assert!(session.resume(at()).is_err());
        assert!(session.reset(at()).is_err());
        session.start(at()).unwrap();
        assert!(session.resume(at()).is_err());
        assert!(session.start(at()).is_err());
    }

    #[test]
    fn reward_formula() {
        assert_eq!(completion_reward(25), 50);
        assert_eq!(completion_reward(5), 10);
        assert_eq!(completion_reward(4), 0);
        assert_eq!(completion_reward(59), 110);
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut session = FocusSession::new(1, Theme::Kpop);
        session.start(at()).unwrap();
        run_ticks(&mut session, 30);
        match session.snapshot(at()) {
            Event::StateSnapshot {
                state,
                time_left_secs,
                progress_pct,
                ..
            } => {
                assert_eq!(state, SessionState::Running);
                assert_eq!(time_left_secs, 30);
                assert!((progress_pct - 50.0).abs() < f64::EPSILON);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
