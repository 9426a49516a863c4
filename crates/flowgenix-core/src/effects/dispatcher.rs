//! Effect execution and its log.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::capability::{Capabilities, CapabilityOutcome};
use super::{Effect, CHIME_TRACK};

/// Result of running a single effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectResult {
    pub effect: String,
    pub status: ExecutionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    Success,
    /// The capability refused (e.g. permission denied).
    Failed {
        reason: String,
        retriable: bool,
    },
    /// No device or surface to run it on.
    Skipped {
        reason: String,
    },
}

/// Log of one dispatch batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchLog {
    pub results: Vec<EffectResult>,
}

impl DispatchLog {
    pub fn success_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ExecutionStatus::Success))
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| !matches!(r.status, ExecutionStatus::Success))
            .count()
    }

    pub fn extend(&mut self, other: DispatchLog) {
        self.results.extend(other.results);
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Runs effects against the front end's capabilities.
///
/// Effects run in order. A refused or unavailable capability is logged and
/// recorded; it never stops the rest of the batch.
pub struct EffectDispatcher {
    caps: Capabilities,
}

impl EffectDispatcher {
    pub fn new(caps: Capabilities) -> Self {
        Self { caps }
    }

    pub fn dispatch(&self, effects: Vec<Effect>, at: NaiveDateTime) -> DispatchLog {
        let results = effects
            .iter()
            .map(|effect| self.dispatch_one(effect, at).1)
            .collect();
        DispatchLog { results }
    }

    /// Run one effect, returning the capability's answer alongside its record.
    pub fn dispatch_one(&self, effect: &Effect, at: NaiveDateTime) -> (CapabilityOutcome, EffectResult) {
        let outcome = self.run(effect);
        let status = match outcome {
            CapabilityOutcome::Granted => ExecutionStatus::Success,
            CapabilityOutcome::Denied => {
                tracing::warn!(effect = effect.name(), %at, "effect denied");
                ExecutionStatus::Failed {
                    reason: "permission denied".into(),
                    retriable: false,
                }
            }
            CapabilityOutcome::Unavailable => {
                tracing::warn!(effect = effect.name(), %at, "effect unavailable");
                ExecutionStatus::Skipped {
                    reason: "capability unavailable".into(),
                }
            }
        };
        (
            outcome,
            EffectResult {
                effect: effect.name().to_string(),
                status,
            },
        )
    }

    fn run(&self, effect: &Effect) -> CapabilityOutcome {
        match effect {
            Effect::ShowOverlay { theme } => self.caps.overlay.show(*theme),
            Effect::HideOverlay => self.caps.overlay.hide(),
            Effect::AcquireCamera => self.caps.camera.acquire(),
            Effect::ReleaseCamera => self.caps.camera.release(),
            Effect::PlayAmbient { track } => self.caps.audio.play_loop(track),
            Effect::StopAmbient => self.caps.audio.stop(),
            Effect::PlayChime => self.caps.audio.play_once(CHIME_TRACK),
            Effect::Notify { title, body } => self.caps.notifier.notify(title, body),
            Effect::Speak { text } => self.caps.speaker.speak(text),
            Effect::Toast(notice) => self.caps.messages.post(notice),
        }
    }
}
