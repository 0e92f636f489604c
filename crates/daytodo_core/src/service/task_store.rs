//! Task store service.
//!
//! # Responsibility
//! - Append, complete and delete tasks while keeping the in-memory
//!   container and task values in step with storage.
//!
//! # Invariants
//! - In-memory state changes only after the store write succeeded.
//! - `set_completed` with the current value performs no write.
//! - Deleting an unknown task is a no-op, not an error.

use crate::model::day::DayContainer;
use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::{StoreError, StoreResult};
use log::{debug, info};

/// Task mutation service over a repository implementation.
pub struct TaskStore<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads one task by id.
    pub fn get(&self, id: TaskId) -> StoreResult<Option<Task>> {
        self.repo.get_task(id)
    }

    /// Persists `task` under `container` and appends it to the collection.
    pub fn append(&self, container: &mut DayContainer, task: Task) -> StoreResult<()> {
        if task.day != container.day {
            return Err(StoreError::DayMismatch {
                task_day: task.day,
                container_day: container.day.clone(),
            });
        }

        self.repo.insert_task(&task)?;
        info!(
            "event=task_append module=service status=ok task_id={} day_size={}",
            task.id,
            container.tasks.len() + 1
        );
        container.tasks.push(task);
        Ok(())
    }

    /// Sets the completion flag.
    ///
    /// Returns `false` without touching storage when the flag already holds
    /// `completed`.
    pub fn set_completed(&self, task: &mut Task, completed: bool) -> StoreResult<bool> {
        if task.is_completed == completed {
            debug!(
                "event=task_complete module=service status=skipped task_id={} reason=unchanged",
                task.id
            );
            return Ok(false);
        }

        self.repo.set_task_completed(task.id, completed)?;
        task.is_completed = completed;
        info!(
            "event=task_complete module=service status=ok task_id={} completed={}",
            task.id, completed
        );
        Ok(true)
    }

    /// Deletes a task from `container` and from storage.
    ///
    /// Returns `false` when the task was already gone.
    pub fn delete(&self, container: &mut DayContainer, id: TaskId) -> StoreResult<bool> {
        match self.repo.get_task(id)? {
            None => {
                container.remove_task(id);
                debug!(
                    "event=task_delete module=service status=skipped task_id={} reason=missing",
                    id
                );
                Ok(false)
            }
            Some(stored) if stored.day != container.day => Err(StoreError::DayMismatch {
                task_day: stored.day,
                container_day: container.day.clone(),
            }),
            Some(_) => {
                let removed = self.repo.delete_task(id)?;
                container.remove_task(id);
                info!(
                    "event=task_delete module=service status=ok task_id={} day_size={}",
                    id,
                    container.tasks.len()
                );
                Ok(removed)
            }
        }
    }
}
