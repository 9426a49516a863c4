//! Calendar events with optional voice reminders.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_reminder")]
    pub reminder_enabled: bool,
}

fn default_reminder() -> bool {
    true
}

impl CalendarEvent {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub description: String,
    pub reminder_enabled: bool,
}

/// Persisted under the `calendar` key as a plain array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Calendar {
    events: Vec<CalendarEvent>,
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.events.iter()
    }

    pub fn get(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn add(&mut self, draft: EventDraft) -> Result<&CalendarEvent, ValidationError> {
        if draft.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        let time = draft.time.ok_or(ValidationError::MissingField("time"))?;
        let idx = self.events.len();
        self.events.push(CalendarEvent {
            id: Uuid::new_v4().to_string(),
            title: draft.title.trim().to_string(),
            date: draft.date,
            time,
            description: draft.description,
            reminder_enabled: draft.reminder_enabled,
        });
        Ok(&self.events[idx])
    }

    pub fn remove(&mut self, id: &str) -> Option<CalendarEvent> {
        let idx = self.events.iter().position(|e| e.id == id)?;
        Some(self.events.remove(idx))
    }

    /// Events on `date`, earliest first.
    pub fn on(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        let mut out: Vec<_> = self.events.iter().filter(|e| e.date == date).collect();
        out.sort_by_key(|e| e.time);
        out
    }

    /// Events starting at or after `now`, earliest first.
    pub fn upcoming(&self, now: NaiveDateTime) -> Vec<&CalendarEvent> {
        let mut out: Vec<_> = self.events.iter().filter(|e| e.starts_at() >= now).collect();
        out.sort_by_key(|e| e.starts_at());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn draft(title: &str, d: u32, h: Option<u32>) -> EventDraft {
        EventDraft {
            title: title.into(),
            date: date(d),
            time: h.and_then(|h| NaiveTime::from_hms_opt(h, 0, 0)),
            description: String::new(),
            reminder_enabled: true,
        }
    }

    #[test]
    fn add_requires_title_and_time() {
        let mut cal = Calendar::new();
        assert_eq!(
            cal.add(draft("", 1, Some(9))).unwrap_err(),
            ValidationError::MissingField("title")
        );
        assert_eq!(
            cal.add(draft("Standup", 1, None)).unwrap_err(),
            ValidationError::MissingField("time")
        );
        assert!(cal.is_empty());
    }

    #[test]
    fn events_by_day_are_time_ordered() {
        let mut cal = Calendar::new();
        cal.add(draft("late", 1, Some(17))).unwrap();
        cal.add(draft("early", 1, Some(8))).unwrap();
        cal.add(draft("other day", 2, Some(8))).unwrap();
        let titles: Vec<_> = cal.on(date(1)).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["early", "late"]);

        let now = date(1).and_hms_opt(12, 0, 0).unwrap();
        let upcoming: Vec<_> = cal.upcoming(now).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(upcoming, vec!["late", "other day"]);
    }

    #[test]
    fn reminder_defaults_on_when_missing() {
        let json = r#"[{"id":"e1","title":"Gym","date":"2026-07-01","time":"18:00:00"}]"#;
        let cal: Calendar = serde_json::from_str(json).unwrap();
        assert!(cal.get("e1").unwrap().reminder_enabled);
    }
}
