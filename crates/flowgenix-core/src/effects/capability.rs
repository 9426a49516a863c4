//! Device and surface capabilities the dispatcher drives.
//!
//! Each call answers [`CapabilityOutcome`]. A capability never errors: a
//! denied permission or a missing device is an ordinary answer.

use std::cell::RefCell;
use std::rc::Rc;

use super::Notice;
use crate::timer::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityOutcome {
    Granted,
    Denied,
    Unavailable,
}

pub trait Notifier {
    fn notify(&self, title: &str, body: &str) -> CapabilityOutcome;
}

pub trait Speaker {
    fn speak(&self, text: &str) -> CapabilityOutcome;
}

pub trait CameraDevice {
    fn acquire(&self) -> CapabilityOutcome;
    fn release(&self) -> CapabilityOutcome;
}

pub trait AudioPlayer {
    fn play_loop(&self, track: &str) -> CapabilityOutcome;
    fn play_once(&self, track: &str) -> CapabilityOutcome;
    fn stop(&self) -> CapabilityOutcome;
}

pub trait OverlaySurface {
    fn show(&self, theme: Theme) -> CapabilityOutcome;
    fn hide(&self) -> CapabilityOutcome;
}

pub trait MessageSink {
    fn post(&self, notice: &Notice) -> CapabilityOutcome;
}

/// The full set of capabilities a front end provides.
pub struct Capabilities {
    pub notifier: Box<dyn Notifier>,
    pub speaker: Box<dyn Speaker>,
    pub camera: Box<dyn CameraDevice>,
    pub audio: Box<dyn AudioPlayer>,
    pub overlay: Box<dyn OverlaySurface>,
    pub messages: Box<dyn MessageSink>,
}

impl Capabilities {
    /// No devices at all; notifications and messages go to the log.
    pub fn headless() -> Self {
        Self {
            notifier: Box::new(HeadlessCapabilities),
            speaker: Box::new(HeadlessCapabilities),
            camera: Box::new(HeadlessCapabilities),
            audio: Box::new(HeadlessCapabilities),
            overlay: Box::new(HeadlessCapabilities),
            messages: Box::new(HeadlessCapabilities),
        }
    }

    /// Every capability backed by the same recorder.
    pub fn recording(recorder: &RecordingCapabilities) -> Self {
        Self {
            notifier: Box::new(recorder.clone()),
            speaker: Box::new(recorder.clone()),
            camera: Box::new(recorder.clone()),
            audio: Box::new(recorder.clone()),
            overlay: Box::new(recorder.clone()),
            messages: Box::new(recorder.clone()),
        }
    }
}

/// Stand-in for environments without speakers, cameras or a screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessCapabilities;

impl Notifier for HeadlessCapabilities {
    fn notify(&self, title: &str, body: &str) -> CapabilityOutcome {
        tracing::info!(title, body, "notification");
        CapabilityOutcome::Granted
    }
}

impl Speaker for HeadlessCapabilities {
    fn speak(&self, _text: &str) -> CapabilityOutcome {
        CapabilityOutcome::Unavailable
    }
}

impl CameraDevice for HeadlessCapabilities {
    fn acquire(&self) -> CapabilityOutcome {
        CapabilityOutcome::Unavailable
    }

    fn release(&self) -> CapabilityOutcome {
        CapabilityOutcome::Granted
    }
}

impl AudioPlayer for HeadlessCapabilities {
    fn play_loop(&self, _track: &str) -> CapabilityOutcome {
        CapabilityOutcome::Unavailable
    }

    fn play_once(&self, _track: &str) -> CapabilityOutcome {
        CapabilityOutcome::Unavailable
    }

    fn stop(&self) -> CapabilityOutcome {
        CapabilityOutcome::Granted
    }
}

impl OverlaySurface for HeadlessCapabilities {
    fn show(&self, _theme: Theme) -> CapabilityOutcome {
        CapabilityOutcome::Unavailable
    }

    fn hide(&self) -> CapabilityOutcome {
        CapabilityOutcome::Granted
    }
}

impl MessageSink for HeadlessCapabilities {
    fn post(&self, notice: &Notice) -> CapabilityOutcome {
        tracing::info!(severity = ?notice.severity, "{}", notice.message);
        CapabilityOutcome::Granted
    }
}

#[derive(Debug)]
struct Recording {
    calls: Vec<String>,
    notices: Vec<Notice>,
    camera: CapabilityOutcome,
    speech: CapabilityOutcome,
}

/// Records every capability call. Clones share one recording, so a test can
/// hand clones to [`Capabilities::recording`] and inspect them afterwards.
#[derive(Debug, Clone)]
pub struct RecordingCapabilities {
    inner: Rc<RefCell<Recording>>,
}

impl Default for RecordingCapabilities {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCapabilities {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Recording {
                calls: Vec::new(),
                notices: Vec::new(),
                camera: CapabilityOutcome::Granted,
                speech: CapabilityOutcome::Granted,
            })),
        }
    }

    /// What camera acquisition answers from now on.
    pub fn set_camera(&self, outcome: CapabilityOutcome) {
        self.inner.borrow_mut().camera = outcome;
    }

    pub fn set_speech(&self, outcome: CapabilityOutcome) {
        self.inner.borrow_mut().speech = outcome;
    }

    /// Calls so far, as `name` or `name:arg`.
    pub fn calls(&self) -> Vec<String> {
        self.inner.borrow().calls.clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.inner.borrow().notices.clone()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.calls.clear();
        inner.notices.clear();
    }

    fn record(&self, call: String) {
        self.inner.borrow_mut().calls.push(call);
    }
}

impl Notifier for RecordingCapabilities {
    fn notify(&self, title: &str, _body: &str) -> CapabilityOutcome {
        self.record(format!("notify:{title}"));
        CapabilityOutcome::Granted
    }
}

impl Speaker for RecordingCapabilities {
    fn speak(&self, text: &str) -> CapabilityOutcome {
        self.record(format!("speak:{text}"));
        self.inner.borrow().speech
    }
}

impl CameraDevice for RecordingCapabilities {
    fn acquire(&self) -> CapabilityOutcome {
        self.record("camera_acquire".into());
        self.inner.borrow().camera
    }

    fn release(&self) -> CapabilityOutcome {
        self.record("camera_release".into());
        CapabilityOutcome::Granted
    }
}

impl AudioPlayer for RecordingCapabilities {
    fn play_loop(&self, track: &str) -> CapabilityOutcome {
        self.record(format!("audio_loop:{track}"));
        CapabilityOutcome::Granted
    }

    fn play_once(&self, track: &str) -> CapabilityOutcome {
        self.record(format!("audio_once:{track}"));
        CapabilityOutcome::Granted
    }

    fn stop(&self) -> CapabilityOutcome {
        self.record("audio_stop".into());
        CapabilityOutcome::Granted
    }
}

impl OverlaySurface for RecordingCapabilities {
    fn show(&self, theme: Theme) -> CapabilityOutcome {
        self.record(format!("overlay_show:{theme}"));
        CapabilityOutcome::Granted
    }

    fn hide(&self) -> CapabilityOutcome {
        self.record("overlay_hide".into());
        CapabilityOutcome::Granted
    }
}

impl MessageSink for RecordingCapabilities {
    fn post(&self, notice: &Notice) -> CapabilityOutcome {
        self.record(format!("message:{}", notice.message));
        self.inner.borrow_mut().notices.push(notice.clone());
        CapabilityOutcome::Granted
    }
}
