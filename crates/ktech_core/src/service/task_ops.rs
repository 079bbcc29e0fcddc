//! Pure task collection transforms.
//!
//! # Responsibility
//! - Implement add/update/delete/toggle over an immutable task slice.
//!
//! # Invariants
//! - Inputs are never mutated; every operation returns a new collection.
//! - Collection order is insertion order and is preserved by every operation.
//! - Ids are unique within the collection and never rewritten.
//! - Persisting the result is the caller's job.

use crate::model::task::{NewTask, Task, TaskId, TaskPatch, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOpError {
    Validation(TaskValidationError),
    NotFound(TaskId),
    DuplicateId(TaskId),
}

impl Display for TaskOpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::DuplicateId(id) => write!(f, "task id already in use: {id}"),
        }
    }
}

impl Error for TaskOpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for TaskOpError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Result of a delete, carrying the navigation signal for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub tasks: Vec<Task>,
    pub removed: Task,
    /// The removed task was the one being viewed.
    pub navigate_away: bool,
}

/// Appends a new task built from `draft` under `id`.
///
/// New tasks start incomplete and not favorited.
pub fn add_task(tasks: &[Task], draft: NewTask, id: TaskId) -> Result<Vec<Task>, TaskOpError> {
    if tasks.iter().any(|task| task.id == id) {
        return Err(TaskOpError::DuplicateId(id));
    }

    let task = Task {
        id,
        title: draft.title,
        description: draft.description,
        completed: false,
        priority: draft.priority,
        due_date: draft.due_date,
        category: draft.category,
        favorite: false,
    };
    task.validate()?;

    let mut next = tasks.to_vec();
    next.push(task);
    Ok(next)
}

/// Applies `patch` to the task with `id`.
pub fn update_task(tasks: &[Task], id: &str, patch: &TaskPatch) -> Result<Vec<Task>, TaskOpError> {
    map_one(tasks, id, |task| {
        patch.apply_to(task);
        task.validate()
    })
}

/// Removes the task with `id`. `viewing` is the id currently on screen.
pub fn delete_task(
    tasks: &[Task],
    id: &str,
    viewing: Option<&str>,
) -> Result<DeleteOutcome, TaskOpError> {
    let index = position(tasks, id)?;
    let mut next = tasks.to_vec();
    let removed = next.remove(index);

    Ok(DeleteOutcome {
        tasks: next,
        navigate_away: viewing == Some(id),
        removed,
    })
}

pub fn toggle_favorite(tasks: &[Task], id: &str) -> Result<Vec<Task>, TaskOpError> {
    map_one(tasks, id, |task| {
        task.favorite = !task.favorite;
        Ok(())
    })
}

pub fn toggle_completed(tasks: &[Task], id: &str) -> Result<Vec<Task>, TaskOpError> {
    map_one(tasks, id, |task| {
        task.completed = !task.completed;
        Ok(())
    })
}

fn position(tasks: &[Task], id: &str) -> Result<usize, TaskOpError> {
    tasks
        .iter()
        .position(|task| task.id == id)
        .ok_or_else(|| TaskOpError::NotFound(id.to_string()))
}

fn map_one(
    tasks: &[Task],
    id: &str,
    edit: impl FnOnce(&mut Task) -> Result<(), TaskValidationError>,
) -> Result<Vec<Task>, TaskOpError> {
    let index = position(tasks, id)?;
    let mut next = tasks.to_vec();
    edit(&mut next[index])?;
    Ok(next)
}
