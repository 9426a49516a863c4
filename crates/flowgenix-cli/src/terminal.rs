//! Capabilities a plain terminal can offer.
//!
//! Notifications, messages and the completion chime are written to stdout,
//! and spoken reminders are printed as captions. There is no camera or
//! ambient audio here, so those report unavailable and the dispatcher
//! degrades around them.

use flowgenix_core::effects::{
    AudioPlayer, CameraDevice, CapabilityOutcome, MessageSink, Notifier, OverlaySurface, Speaker,
};
use flowgenix_core::{Capabilities, Config, Notice, Severity, Theme};

#[derive(Debug, Clone, Copy, Default)]
pub struct Terminal;

impl Terminal {
    pub fn capabilities(config: &Config) -> Capabilities {
        Capabilities {
            notifier: Box::new(Terminal),
            speaker: Box::new(Captions {
                language: config.reminders.voice_language.clone(),
            }),
            camera: Box::new(Terminal),
            audio: Box::new(Terminal),
            overlay: Box::new(Terminal),
            messages: Box::new(Terminal),
        }
    }
}

impl Notifier for Terminal {
    fn notify(&self, title: &str, body: &str) -> CapabilityOutcome {
        println!("\n** {title} ** {body}");
        CapabilityOutcome::Granted
    }
}

/// Stands in for text-to-speech.
#[derive(Debug, Clone)]
pub struct Captions {
    language: String,
}

impl Speaker for Captions {
    fn speak(&self, text: &str) -> CapabilityOutcome {
        println!("({}) \"{text}\"", self.language);
        CapabilityOutcome::Granted
    }
}

impl CameraDevice for Terminal {
    fn acquire(&self) -> CapabilityOutcome {
        CapabilityOutcome::Unavailable
    }

    fn release(&self) -> CapabilityOutcome {
        CapabilityOutcome::Granted
    }
}

impl AudioPlayer for Terminal {
    fn play_loop(&self, _track: &str) -> CapabilityOutcome {
        CapabilityOutcome::Unavailable
    }

    /// Terminal bell.
    fn play_once(&self, _track: &str) -> CapabilityOutcome {
        print!("\x07");
        CapabilityOutcome::Granted
    }

    fn stop(&self) -> CapabilityOutcome {
        CapabilityOutcome::Granted
    }
}

impl OverlaySurface for Terminal {
    fn show(&self, theme: Theme) -> CapabilityOutcome {
        println!("==== {} :: focus mode ====", theme.title().to_uppercase());
        CapabilityOutcome::Granted
    }

    fn hide(&self) -> CapabilityOutcome {
        CapabilityOutcome::Granted
    }
}

impl MessageSink for Terminal {
    fn post(&self, notice: &Notice) -> CapabilityOutcome {
        let tag = match notice.severity {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        println!("[{tag}] {}", notice.message);
        CapabilityOutcome::Granted
    }
}
