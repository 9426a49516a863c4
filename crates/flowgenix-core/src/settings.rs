//! User preferences and profile, persisted in the store under `settings`
//! and `user`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::timer::Theme;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default)]
    pub camera_check: bool,
    #[serde(default = "default_true")]
    pub background_music: bool,
    #[serde(default)]
    pub app_blocking: bool,
    #[serde(default = "default_true")]
    pub reminder_voice: bool,
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,
}

fn default_true() -> bool {
    true
}

fn default_minutes() -> u32 {
    25
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            notifications: true,
            camera_check: false,
            background_music: true,
            app_blocking: false,
            reminder_voice: true,
            default_minutes: default_minutes(),
        }
    }
}

impl Settings {
    /// Set a setting by name from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let parse_bool = |v: &str| {
            v.parse::<bool>()
                .map_err(|_| format!("cannot parse '{v}' as bool"))
        };
        match key {
            "theme" => self.theme = value.parse()?,
            "notifications" => self.notifications = parse_bool(value)?,
            "camera_check" => self.camera_check = parse_bool(value)?,
            "background_music" => self.background_music = parse_bool(value)?,
            "app_blocking" => self.app_blocking = parse_bool(value)?,
            "reminder_voice" => self.reminder_voice = parse_bool(value)?,
            "default_minutes" => {
                self.default_minutes = value
                    .parse()
                    .map_err(|_| format!("cannot parse '{value}' as minutes"))?
            }
            other => return Err(format!("unknown setting: {other}")),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        match value.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Stored profile. There is no authentication behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: String,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_by_name() {
        let mut s = Settings::default();
        s.set("theme", "music").unwrap();
        s.set("camera_check", "true").unwrap();
        s.set("default_minutes", "45").unwrap();
        assert_eq!(s.get("theme").as_deref(), Some("music"));
        assert_eq!(s.get("camera_check").as_deref(), Some("true"));
        assert_eq!(s.get("default_minutes").as_deref(), Some("45"));
    }

    #[test]
    fn set_rejects_unknown_and_bad_values() {
        let mut s = Settings::default();
        assert!(s.set("volume", "3").is_err());
        assert!(s.set("notifications", "maybe").is_err());
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"app_blocking": true}"#).unwrap();
        assert!(s.app_blocking);
        assert!(s.notifications);
        assert_eq!(s.default_minutes, 25);
    }
}
