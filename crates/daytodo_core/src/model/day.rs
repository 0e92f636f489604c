//! Day container model.
//!
//! A day container groups all tasks scheduled on one calendar day. The key is
//! the formatted date string produced by `calendar::DayCalendar`.

use crate::model::task::{Task, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Canonical calendar-day key, e.g. `"Jun 1, 2024"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DayKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-day record owning its tasks in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayContainer {
    pub day: DayKey,
    pub tasks: Vec<Task>,
}

impl DayContainer {
    /// Creates a container with no tasks.
    pub fn empty(day: DayKey) -> Self {
        Self {
            day,
            tasks: Vec::new(),
        }
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Removes a task by id, returning it when present.
    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Tasks sorted ascending by start time.
    ///
    /// The sort is stable, so equal start times keep insertion order.
    pub fn tasks_by_start(&self) -> Vec<Task> {
        let mut sorted = self.tasks.clone();
        sorted.sort_by_key(|task| task.start_epoch_ms);
        sorted
    }
}
