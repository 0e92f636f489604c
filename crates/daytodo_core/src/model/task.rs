//! Task domain model.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `end_epoch_ms >= start_epoch_ms`.
//! - `description` holds at most [`DESCRIPTION_LIMIT`] characters.
//! - `is_completed` is the only field mutated after creation.

use crate::model::day::DayKey;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Maximum number of characters kept in a task description.
pub const DESCRIPTION_LIMIT: usize = 50;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Validation failures for task write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task ids must never be the nil UUID.
    NilId,
    /// Day key is empty after trimming.
    BlankDay,
    /// End timestamp precedes start timestamp.
    InvalidTimeWindow { start: i64, end: i64 },
    /// Description exceeds [`DESCRIPTION_LIMIT`] characters.
    DescriptionTooLong { chars: usize, limit: usize },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
            Self::BlankDay => write!(f, "day key must not be blank"),
            Self::InvalidTimeWindow { start, end } => {
                write!(f, "end_epoch_ms ({end}) must be >= start_epoch_ms ({start})")
            }
            Self::DescriptionTooLong { chars, limit } => {
                write!(f, "description has {chars} characters, limit is {limit}")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// One time-boxed to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskFields")]
pub struct Task {
    pub id: TaskId,
    /// Owning day container. Used for removal lookups only.
    pub day: DayKey,
    /// Unix epoch milliseconds.
    pub start_epoch_ms: i64,
    /// Unix epoch milliseconds, same calendar day as the start.
    pub end_epoch_ms: i64,
    pub description: String,
    pub is_completed: bool,
}

impl Task {
    /// Creates an incomplete task with a freshly generated id.
    pub fn new(
        day: DayKey,
        start_epoch_ms: i64,
        end_epoch_ms: i64,
        description: impl Into<String>,
    ) -> Result<Self, TaskValidationError> {
        Self::with_id(
            Uuid::new_v4(),
            day,
            start_epoch_ms,
            end_epoch_ms,
            description,
        )
    }

    /// Creates an incomplete task with a caller-provided id.
    pub fn with_id(
        id: TaskId,
        day: DayKey,
        start_epoch_ms: i64,
        end_epoch_ms: i64,
        description: impl Into<String>,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            day,
            start_epoch_ms,
            end_epoch_ms,
            description: description.into(),
            is_completed: false,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks write-time invariants.
    ///
    /// Same-calendar-day placement of start/end depends on the calendar in
    /// use and is checked by the entry flow, not here.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.day.as_str().trim().is_empty() {
            return Err(TaskValidationError::BlankDay);
        }
        if self.end_epoch_ms < self.start_epoch_ms {
            return Err(TaskValidationError::InvalidTimeWindow {
                start: self.start_epoch_ms,
                end: self.end_epoch_ms,
            });
        }
        let chars = self.description.chars().count();
        if chars > DESCRIPTION_LIMIT {
            return Err(TaskValidationError::DescriptionTooLong {
                chars,
                limit: DESCRIPTION_LIMIT,
            });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct TaskFields {
    id: TaskId,
    day: DayKey,
    start_epoch_ms: i64,
    end_epoch_ms: i64,
    description: String,
    is_completed: bool,
}

impl TryFrom<TaskFields> for Task {
    type Error = TaskValidationError;

    fn try_from(value: TaskFields) -> Result<Self, Self::Error> {
        let task = Self {
            id: value.id,
            day: value.day,
            start_epoch_ms: value.start_epoch_ms,
            end_epoch_ms: value.end_epoch_ms,
            description: value.description,
            is_completed: value.is_completed,
        };
        task.validate()?;
        Ok(task)
    }
}

/// Result of clamping raw description input to [`DESCRIPTION_LIMIT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClampedDescription {
    pub text: String,
    /// Set once the input reaches the limit. Advisory only.
    pub limit_reached: bool,
}

/// Clamps description input to the first [`DESCRIPTION_LIMIT`] characters.
///
/// Meant to run on every edit, not only at submit time.
pub fn clamp_description(input: &str) -> ClampedDescription {
    let text: String = input.chars().take(DESCRIPTION_LIMIT).collect();
    let limit_reached = text.chars().count() == DESCRIPTION_LIMIT;
    ClampedDescription {
        text,
        limit_reached,
    }
}

/// Advisory shown while the description sits at the limit.
pub fn description_limit_message() -> String {
    format!("Need a task description with less than {DESCRIPTION_LIMIT} characters")
}
