//! Side effects of state transitions.
//!
//! [`effects_for`] is a pure mapping from a transition and the current
//! settings to an ordered list of [`Effect`]s. The [`EffectDispatcher`] then
//! runs them against injected capabilities, best-effort.

mod capability;
mod dispatcher;

pub use capability::{
    AudioPlayer, CameraDevice, Capabilities, CapabilityOutcome, HeadlessCapabilities,
    MessageSink, Notifier, OverlaySurface, RecordingCapabilities, Speaker,
};
pub use dispatcher::{DispatchLog, EffectDispatcher, EffectResult, ExecutionStatus};

use serde::{Deserialize, Serialize};

use crate::reminder::ReminderKind;
use crate::settings::Settings;
use crate::timer::Theme;

pub const CHIME_TRACK: &str = "sounds/timer-complete.mp3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Short-lived message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    ShowOverlay { theme: Theme },
    HideOverlay,
    AcquireCamera,
    ReleaseCamera,
    PlayAmbient { track: String },
    StopAmbient,
    PlayChime,
    Notify { title: String, body: String },
    Speak { text: String },
    Toast(Notice),
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::ShowOverlay { .. } => "show_overlay",
            Effect::HideOverlay => "hide_overlay",
            Effect::AcquireCamera => "acquire_camera",
            Effect::ReleaseCamera => "release_camera",
            Effect::PlayAmbient { .. } => "play_ambient",
            Effect::StopAmbient => "stop_ambient",
            Effect::PlayChime => "play_chime",
            Effect::Notify { .. } => "notify",
            Effect::Speak { .. } => "speak",
            Effect::Toast(_) => "toast",
        }
    }
}

/// State changes that carry side effects.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    SessionStarted { theme: Theme, minutes: u32 },
    SessionPaused,
    SessionResumed { theme: Theme },
    SessionReset { elapsed_secs: u64 },
    SessionCompleted { minutes: u32, coins: u64, theme: Theme },
    ReminderDue { title: String, kind: ReminderKind },
    TaskCompleted { title: String, coins: u64 },
    TaskReopened { title: String },
    CouponRedeemed { reward: String, cost: u64 },
}

/// Effects for `transition`, in the order they should run.
pub fn effects_for(transition: &Transition, settings: &Settings) -> Vec<Effect> {
    let mut out = Vec::new();
    match transition {
        Transition::SessionStarted { theme, minutes } => {
            if settings.app_blocking {
                out.push(Effect::ShowOverlay { theme: *theme });
            }
            if settings.background_music {
                out.push(Effect::PlayAmbient {
                    track: theme.ambient_track(),
                });
            }
            out.push(Effect::Toast(Notice::success(format!(
                "{} started: {minutes} minutes",
                theme.title()
            ))));
        }
        Transition::SessionPaused => {
            if settings.background_music {
                out.push(Effect::StopAmbient);
            }
            if settings.camera_check {
                out.push(Effect::ReleaseCamera);
            }
            out.push(Effect::Toast(Notice::info("Timer paused")));
        }
        Transition::SessionResumed { theme } => {
            if settings.background_music {
                out.push(Effect::PlayAmbient {
                    track: theme.ambient_track(),
                });
            }
            out.push(Effect::Toast(Notice::info("Timer resumed")));
        }
        Transition::SessionReset { elapsed_secs } => {
            out.push(Effect::HideOverlay);
            out.push(Effect::StopAmbient);
            out.push(Effect::ReleaseCamera);
            out.push(Effect::Toast(Notice::info(format!(
                "Session reset after {} minutes. No coins awarded.",
                elapsed_secs / 60
            ))));
        }
        Transition::SessionCompleted {
            minutes,
            coins,
            theme,
        } => {
            out.push(Effect::HideOverlay);
            out.push(Effect::StopAmbient);
            out.push(Effect::ReleaseCamera);
            out.push(Effect::PlayChime);
            if settings.notifications {
                out.push(Effect::Notify {
                    title: "Focus Session Complete!".into(),
                    body: format!("Great job! You earned {coins} coins."),
                });
            }
            out.push(Effect::Toast(Notice::success(format!(
                "{} complete: {minutes} minutes focused, +{coins} coins",
                theme.title()
            ))));
        }
        Transition::ReminderDue { title, kind } => {
            let text = match kind {
                ReminderKind::HourBefore => format!("Reminder: {title} is due in one hour"),
                ReminderKind::MorningOf => format!("Reminder: {title} is due today"),
                ReminderKind::EveningBefore => format!("Reminder: {title} is due tomorrow morning"),
            };
            if settings.notifications {
                out.push(Effect::Notify {
                    title: "FlowGenix Reminder".into(),
                    body: text.clone(),
                });
            }
            if settings.reminder_voice {
                out.push(Effect::Speak { text: text.clone() });
            }
            out.push(Effect::Toast(Notice::info(text)));
        }
        Transition::TaskCompleted { title, coins } => {
            out.push(Effect::Toast(Notice::success(format!(
                "Completed \"{title}\": +{coins} coins"
            ))));
        }
        Transition::TaskReopened { title } => {
            out.push(Effect::Toast(Notice::info(format!(
                "\"{title}\" marked as incomplete"
            ))));
        }
        Transition::CouponRedeemed { reward, cost } => {
            out.push(Effect::Toast(Notice::success(format!(
                "Redeemed {reward} for {cost} coins"
            ))));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(effects: &[Effect]) -> Vec<&'static str> {
        effects.iter().map(Effect::name).collect()
    }

    #[test]
    fn start_respects_settings() {
        let start = Transition::SessionStarted {
            theme: Theme::Anime,
            minutes: 25,
        };
        let quiet = Settings {
            background_music: false,
            app_blocking: false,
            ..Settings::default()
        };
        assert_eq!(names(&effects_for(&start, &quiet)), vec!["toast"]);

        let full = Settings {
            app_blocking: true,
            ..Settings::default()
        };
        let effects = effects_for(&start, &full);
        assert_eq!(names(&effects), vec!["show_overlay", "play_ambient", "toast"]);
        assert_eq!(
            effects[1],
            Effect::PlayAmbient {
                track: "sounds/anime-bg.mp3".into()
            }
        );
    }

    #[test]
    fn completion_tears_down_then_celebrates() {
        let done = Transition::SessionCompleted {
            minutes: 25,
            coins: 50,
            theme: Theme::Kpop,
        };
        assert_eq!(
            names(&effects_for(&done, &Settings::default())),
            vec!["hide_overlay", "stop_ambient", "release_camera", "play_chime", "notify", "toast"]
        );

        let muted = Settings {
            notifications: false,
            ..Settings::default()
        };
        assert!(!names(&effects_for(&done, &muted)).contains(&"notify"));
    }

    #[test]
    fn reminder_speaks_only_with_voice_enabled() {
        let due = Transition::ReminderDue {
            title: "Essay".into(),
            kind: ReminderKind::HourBefore,
        };
        let voiced = effects_for(&due, &Settings::default());
        assert!(voiced.contains(&Effect::Speak {
            text: "Reminder: Essay is due in one hour".into()
        }));

        let silent = Settings {
            reminder_voice: false,
            ..Settings::default()
        };
        assert!(!names(&effects_for(&due, &silent)).contains(&"speak"));
    }

    #[test]
    fn reset_reports_elapsed_minutes() {
        let effects = effects_for(
            &Transition::SessionReset { elapsed_secs: 600 },
            &Settings::default(),
        );
        let Some(Effect::Toast(notice)) = effects.last() else {
            panic!("expected a toast last");
        };
        assert!(notice.message.contains("10 minutes"));
    }
}
