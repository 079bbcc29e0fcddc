//! Transient notification entries.
//!
//! # Invariants
//! - A notification only moves `unread -> read`, never back.
//! - Notifications live in memory only; nothing here touches storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NotificationId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A task is due within the look-ahead window.
    Info,
    /// A task is past its due date.
    Warning,
    /// One-time welcome entry.
    Success,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Success => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    /// Creates an unread notification stamped at `now`.
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            message: message.into(),
            kind,
            timestamp: now,
            read: false,
        }
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }

    /// Whether this entry's text mentions `task_title`.
    pub fn references(&self, task_title: &str) -> bool {
        self.title.contains(task_title) || self.message.contains(task_title)
    }
}
