//! Derived counters shown on the home, profile and favorites views.

use crate::model::task::{Priority, Task};
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub favorites: usize,
    pub overdue: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        Self {
            total: tasks.len(),
            completed: tasks.iter().filter(|task| task.completed).count(),
            favorites: tasks.iter().filter(|task| task.favorite).count(),
            overdue: tasks.iter().filter(|task| task.is_overdue(now)).count(),
        }
    }

    pub fn pending(&self) -> usize {
        self.total - self.completed
    }

    /// Whole-percent completion rate, rounded half up; 0 with no tasks.
    pub fn completion_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoriteStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub high_priority: usize,
}

impl FavoriteStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let favorites = favorites(tasks);
        Self {
            total: favorites.len(),
            completed: favorites.iter().filter(|task| task.completed).count(),
            pending: favorites.iter().filter(|task| !task.completed).count(),
            high_priority: favorites
                .iter()
                .filter(|task| task.priority == Priority::High)
                .count(),
        }
    }
}

/// Favorited tasks in collection order.
pub fn favorites(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|task| task.favorite).collect()
}

/// Tasks whose due date falls on `day` (UTC calendar day).
pub fn due_on(tasks: &[Task], day: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|task| task.is_due_on(day)).collect()
}
