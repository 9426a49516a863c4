//! Todo list with priority-based coin rewards and JSON export/import.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{ImportError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Coins awarded for completing a task of this priority.
    pub fn coins(&self) -> u64 {
        match self {
            Priority::Low => 5,
            Priority::Medium => 10,
            Priority::High => 15,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        })
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority '{other}' (expected low, medium or high)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_at: NaiveDateTime,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Todo {
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.completed && self.due_at < now
    }
}

/// User input for creating or editing a todo.
#[derive(Debug, Clone, Default)]
pub struct TodoDraft {
    pub title: String,
    pub description: String,
    pub due_at: Option<NaiveDateTime>,
    pub priority: Priority,
}

impl TodoDraft {
    fn validate(&self) -> Result<NaiveDateTime, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        self.due_at.ok_or(ValidationError::MissingField("due date"))
    }
}

/// Result of toggling a todo's completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Completed { coins: u64 },
    Reopened,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TodoFilter {
    /// Pending first, then by due time.
    #[default]
    All,
    /// Pending, due today.
    Today,
    /// Pending, due tomorrow or later.
    Upcoming,
    Completed,
}

impl FromStr for TodoFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TodoFilter::All),
            "today" => Ok(TodoFilter::Today),
            "upcoming" => Ok(TodoFilter::Upcoming),
            "completed" => Ok(TodoFilter::Completed),
            other => Err(format!("unknown filter '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

/// Persisted under the `todos` key as a plain array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoList {
    items: Vec<Todo>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Todo> {
        self.items.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == id)
    }

    pub fn add(&mut self, draft: TodoDraft, now: NaiveDateTime) -> Result<&Todo, ValidationError> {
        let due_at = draft.validate()?;
        let idx = self.items.len();
        self.items.push(Todo {
            id: Uuid::new_v4().to_string(),
            title: draft.title.trim().to_string(),
            description: draft.description,
            due_at,
            priority: draft.priority,
            completed: false,
            completed_at: None,
            created_at: now,
        });
        Ok(&self.items[idx])
    }

    /// Replace the editable fields. Completion state is kept.
    pub fn update(&mut self, id: &str, draft: TodoDraft) -> Result<Option<&Todo>, ValidationError> {
        let due_at = draft.validate()?;
        let Some(todo) = self.items.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        todo.title = draft.title.trim().to_string();
        todo.description = draft.description;
        todo.due_at = due_at;
        todo.priority = draft.priority;
        Ok(Some(&*todo))
    }

    pub fn toggle(&mut self, id: &str, now: NaiveDateTime) -> Option<Toggle> {
        let todo = self.items.iter_mut().find(|t| t.id == id)?;
        todo.completed = !todo.completed;
        if todo.completed {
            todo.completed_at = Some(now);
            Some(Toggle::Completed {
                coins: todo.priority.coins(),
            })
        } else {
            todo.completed_at = None;
            Some(Toggle::Reopened)
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Todo> {
        let idx = self.items.iter().position(|t| t.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Drop every completed todo, returning them.
    pub fn clear_completed(&mut self) -> Vec<Todo> {
        let (done, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.items).into_iter().partition(|t| t.completed);
        self.items = pending;
        done
    }

    pub fn filter(&self, filter: TodoFilter, now: NaiveDateTime) -> Vec<&Todo> {
        let today = now.date().and_hms_opt(0, 0, 0).unwrap_or(now);
        let tomorrow = today + Duration::days(1);
        let mut out: Vec<&Todo> = match filter {
            TodoFilter::Today => self
                .items
                .iter()
                .filter(|t| !t.completed && t.due_at >= today && t.due_at < tomorrow)
                .collect(),
            TodoFilter::Upcoming => self
                .items
                .iter()
                .filter(|t| !t.completed && t.due_at >= tomorrow)
                .collect(),
            TodoFilter::Completed => self.items.iter().filter(|t| t.completed).collect(),
            TodoFilter::All => self.items.iter().collect(),
        };
        out.sort_by(|a, b| a.completed.cmp(&b.completed).then(a.due_at.cmp(&b.due_at)));
        out
    }

    pub fn stats(&self, now: NaiveDateTime) -> TodoStats {
        let total = self.items.len();
        let completed = self.items.iter().filter(|t| t.completed).count();
        TodoStats {
            total,
            completed,
            pending: total - completed,
            overdue: self.items.iter().filter(|t| t.is_overdue(now)).count(),
        }
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.items)
    }

    /// Append the todos in a JSON array. Anything other than an array of
    /// valid todos is rejected and leaves the list unchanged. Imported ids
    /// that collide with existing ones are replaced with fresh ids.
    pub fn import_json(&mut self, json: &str) -> Result<Vec<String>, ImportError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Array(raw) = value else {
            return Err(ImportError::NotAnArray);
        };

        let mut incoming = Vec::with_capacity(raw.len());
        for (index, item) in raw.into_iter().enumerate() {
            let todo: Todo = serde_json::from_value(item).map_err(|e| ImportError::InvalidItem {
                index,
                message: e.to_string(),
            })?;
            if todo.title.trim().is_empty() {
                return Err(ImportError::InvalidItem {
                    index,
                    message: "title is empty".into(),
                });
            }
            incoming.push(todo);
        }

        let mut seen: HashSet<String> = self.items.iter().map(|t| t.id.clone()).collect();
        let mut ids = Vec::with_capacity(incoming.len());
        for mut todo in incoming {
            if !seen.insert(todo.id.clone()) {
                todo.id = Uuid::new_v4().to_string();
                seen.insert(todo.id.clone());
            }
            ids.push(todo.id.clone());
            self.items.push(todo);
        }
        Ok(ids)
    }
}
