//! Notification feed, generator and scan scheduling.
//!
//! # Responsibility
//! - Derive overdue / due-soon / welcome notifications from the task list.
//! - Hold the capped, newest-first feed and its read/dismiss transitions.
//! - Decide when a periodic re-scan is due.
//!
//! # Invariants
//! - The feed never holds more than `MAX_NOTIFICATIONS` entries; the oldest
//!   entries are dropped first.
//! - Scans only read tasks.
//! - While disabled, nothing is generated and existing entries are kept.
//! - At most one overdue and one due-soon entry per task title is present at
//!   a time (matched by title text, not task id).

use crate::model::notification::{Notification, NotificationId, NotificationKind};
use crate::model::task::Task;
use chrono::{DateTime, Duration, Utc};
use log::debug;

pub const MAX_NOTIFICATIONS: usize = 10;
pub const DUE_SOON_WINDOW_HOURS: i64 = 24;
pub const DEFAULT_SCAN_INTERVAL_SECS: i64 = 5 * 60;

const WELCOME_TITLE: &str = "Welcome to ktech!";
const WELCOME_MESSAGE: &str = "Your tasks are now synced and ready to manage";
const OVERDUE_TITLE: &str = "Task Overdue";
const DUE_SOON_TITLE: &str = "Task Due Soon";

/// Newest-first, size-capped list of notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|item| !item.read).count()
    }

    /// Inserts at the front and evicts beyond the cap.
    pub fn push(&mut self, notification: Notification) {
        self.items.insert(0, notification);
        self.items.truncate(MAX_NOTIFICATIONS);
    }

    /// Returns `false` when no entry has `id`.
    pub fn mark_read(&mut self, id: NotificationId) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.mark_read();
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for item in self.items.iter_mut().filter(|item| !item.read) {
            item.mark_read();
            changed += 1;
        }
        changed
    }

    /// Removes the entry with `id`; `false` when absent.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    fn mentions(&self, kind: NotificationKind, task_title: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.kind == kind && item.references(task_title))
    }
}

/// Stateful scan logic. Tracks whether the welcome entry was already issued.
#[derive(Debug, Clone, Default)]
pub struct NotificationGenerator {
    welcomed: bool,
}

impl NotificationGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one scan and returns how many notifications were created.
    pub fn scan(&mut self, feed: &mut NotificationFeed, tasks: &[Task], now: DateTime<Utc>) -> usize {
        let mut created = 0;

        if !self.welcomed && !tasks.is_empty() {
            if feed.is_empty() {
                feed.push(Notification::new(
                    NotificationKind::Success,
                    WELCOME_TITLE,
                    WELCOME_MESSAGE,
                    now,
                ));
                created += 1;
            }
            self.welcomed = true;
        }

        for task in tasks.iter().filter(|task| task.is_overdue(now)) {
            if !feed.mentions(NotificationKind::Warning, &task.title) {
                feed.push(Notification::new(
                    NotificationKind::Warning,
                    OVERDUE_TITLE,
                    format!("\"{}\" is past its due date", task.title),
                    now,
                ));
                created += 1;
            }
        }

        let window = Duration::hours(DUE_SOON_WINDOW_HOURS);
        for task in tasks.iter().filter(|task| task.is_due_within(now, window)) {
            if !feed.mentions(NotificationKind::Info, &task.title) {
                feed.push(Notification::new(
                    NotificationKind::Info,
                    DUE_SOON_TITLE,
                    format!("\"{}\" is due tomorrow", task.title),
                    now,
                ));
                created += 1;
            }
        }

        debug!(
            "event=notifications_scan module=notifications status=ok tasks={} created={} feed_len={}",
            tasks.len(),
            created,
            feed.len()
        );
        created
    }
}

/// Feed + generator + enable flag + periodic schedule.
///
/// The host drives time: call `on_tasks_changed` after every task commit and
/// `tick` from its event loop.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    feed: NotificationFeed,
    generator: NotificationGenerator,
    enabled: bool,
    interval: Duration,
    last_scan: Option<DateTime<Utc>>,
}

impl NotificationCenter {
    pub fn new(enabled: bool, interval: Duration) -> Self {
        Self {
            feed: NotificationFeed::new(),
            generator: NotificationGenerator::new(),
            enabled,
            interval,
            last_scan: None,
        }
    }

    pub fn feed(&self) -> &NotificationFeed {
        &self.feed
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next periodic scan fires, or `None` while suspended.
    pub fn next_scan_at(&self) -> Option<DateTime<Utc>> {
        if !self.enabled {
            return None;
        }
        Some(self.last_scan.map_or(DateTime::<Utc>::MIN_UTC, |last| last + self.interval))
    }

    /// Enabling scans immediately; disabling suspends the schedule.
    pub fn set_enabled(&mut self, enabled: bool, tasks: &[Task], now: DateTime<Utc>) -> usize {
        if self.enabled == enabled {
            return 0;
        }
        self.enabled = enabled;
        if enabled {
            self.scan(tasks, now)
        } else {
            self.last_scan = None;
            0
        }
    }

    /// Immediate scan after the task collection changed.
    pub fn on_tasks_changed(&mut self, tasks: &[Task], now: DateTime<Utc>) -> usize {
        if !self.enabled {
            return 0;
        }
        self.scan(tasks, now)
    }

    /// Scans when the interval has elapsed since the previous scan.
    pub fn tick(&mut self, tasks: &[Task], now: DateTime<Utc>) -> usize {
        match self.next_scan_at() {
            Some(due) if now >= due => self.scan(tasks, now),
            _ => 0,
        }
    }

    pub fn mark_read(&mut self, id: NotificationId) -> bool {
        self.feed.mark_read(id)
    }

    pub fn mark_all_read(&mut self) -> usize {
        self.feed.mark_all_read()
    }

    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.feed.dismiss(id)
    }

    fn scan(&mut self, tasks: &[Task], now: DateTime<Utc>) -> usize {
        self.last_scan = Some(now);
        self.generator.scan(&mut self.feed, tasks, now)
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(true, Duration::seconds(DEFAULT_SCAN_INTERVAL_SECS))
    }
}
