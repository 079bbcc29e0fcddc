//! Task domain model.
//!
//! # Responsibility
//! - Define the stored task record and its creation/patch request shapes.
//! - Interpret the free-form `dueDate` string as an instant.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `title` is non-empty after trimming for every stored task.
//! - An empty or unparsable `due_date` means "no due date".

use crate::model::ids::id_timestamp;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable task identifier (decimal epoch milliseconds at creation).
pub type TaskId = String;

/// Category assigned by the add dialog when the caller picks none.
pub const DEFAULT_CATEGORY: &str = "personal";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Stored to-do item.
///
/// Serialized in camelCase (`dueDate`) to keep the storage layout readable by
/// earlier versions of the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// `YYYY-MM-DD` or RFC 3339; empty when unset.
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub category: String,
    /// Older records omit this field entirely.
    #[serde(default)]
    pub favorite: bool,
}

impl Task {
    /// Parsed due instant, if any.
    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        parse_due_date(&self.due_date)
    }

    /// Creation instant recovered from the time-derived id.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        id_timestamp(&self.id)
    }

    /// Incomplete and due strictly before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        if self.completed {
            return false;
        }
        self.due_at().is_some_and(|due| due < now)
    }

    /// Incomplete and due within `[now, now + window]`.
    pub fn is_due_within(&self, now: DateTime<Utc>, window: Duration) -> bool {
        if self.completed {
            return false;
        }
        self.due_at()
            .is_some_and(|due| due >= now && due <= now + window)
    }

    /// Whether the due date falls on the given UTC calendar day.
    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.due_at().is_some_and(|due| due.date_naive() == day)
    }

    /// Checks stored-record invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Input for creating a task. Id and flags are assigned by the add operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: String,
    pub category: String,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl Default for NewTask {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
    pub category: Option<String>,
    pub favorite: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = &self.due_date {
            task.due_date = due_date.clone();
        }
        if let Some(category) = &self.category {
            task.category = category.clone();
        }
        if let Some(favorite) = self.favorite {
            task.favorite = favorite;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id must not be empty"),
            Self::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Parses a due-date string.
///
/// A bare `YYYY-MM-DD` is midnight UTC of that day; RFC 3339 date-times keep
/// their offset. Anything else yields `None`.
pub fn parse_due_date(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
