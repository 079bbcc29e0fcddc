//! Persistent task collection.
//!
//! # Invariants
//! - The store is the only owner of the task list; readers get slices.
//! - Nothing is written under `userTasks` while the collection has never
//!   been non-empty. Once written, every commit is written, including the
//!   one that empties the list.

use crate::model::ids::TimeIdGenerator;
use crate::model::task::Task;
use crate::repo::kv_repo::KvRepository;
use crate::store::{load_json, save_json, StoreResult, TASKS_KEY};
use log::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    written: bool,
}

impl TaskStore {
    /// Loads the persisted collection, dropping records that fail validation.
    pub fn load<R: KvRepository + ?Sized>(repo: &R) -> StoreResult<Self> {
        let loaded: Option<Vec<Task>> = load_json(repo, TASKS_KEY)?;
        let written = loaded.is_some();
        let mut tasks = loaded.unwrap_or_default();

        let before = tasks.len();
        tasks.retain(|task| task.validate().is_ok());
        if tasks.len() != before {
            warn!(
                "event=tasks_load module=store status=partial dropped={}",
                before - tasks.len()
            );
        }
        info!("event=tasks_load module=store status=ok count={}", tasks.len());

        Ok(Self { tasks, written })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Replaces the collection with the result of a task operation and
    /// persists it.
    pub fn commit<R: KvRepository + ?Sized>(
        &mut self,
        repo: &R,
        tasks: Vec<Task>,
    ) -> StoreResult<()> {
        if self.written || !tasks.is_empty() {
            save_json(repo, TASKS_KEY, &tasks)?;
            self.written = true;
        }
        self.tasks = tasks;
        Ok(())
    }

    /// Seeds an id generator so freshly issued ids never collide with
    /// loaded ones.
    pub fn seed_ids(&self, ids: &mut TimeIdGenerator) {
        for task in &self.tasks {
            ids.observe(&task.id);
        }
    }
}
