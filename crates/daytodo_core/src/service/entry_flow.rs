//! Task entry flow.
//!
//! # Responsibility
//! - Validate raw task input and hand it to the day registry and task store.
//! - Guard against overlapping submissions from the same caller context.
//!
//! # Invariants
//! - Validation fails fast: cross-day first, then reversed time window.
//! - A rejected submission creates no day container and no task.
//! - The in-flight guard is released as soon as persistence returns, on
//!   success and on failure alike.

use crate::calendar::{CalendarError, DayCalendar};
use crate::model::day::DayKey;
use crate::model::task::{clamp_description, Task};
use crate::repo::day_repo::DayRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::StoreError;
use crate::service::day_registry::DayRegistry;
use crate::service::task_store::TaskStore;
use log::{debug, info, warn};
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw task input as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Start in epoch milliseconds.
    pub start_epoch_ms: i64,
    /// End in epoch milliseconds.
    pub end_epoch_ms: i64,
    /// Description text; clamped before the task is built.
    pub description: String,
}

/// Successful submission result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTask {
    pub task: Task,
    /// Description reached the character limit and was clamped.
    pub description_limit_reached: bool,
}

/// Outcome of one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Task was persisted.
    Created(SubmittedTask),
    /// Another submission was still in flight; input was ignored.
    Busy,
}

/// Entry flow failure.
#[derive(Debug)]
pub enum EntryError {
    /// Start and end resolve to different calendar days.
    CrossDay { start_day: DayKey, end_day: DayKey },
    /// End precedes start on the same day.
    EndBeforeStart { start: i64, end: i64 },
    /// A timestamp cannot be placed on the calendar.
    InvalidTimestamp(CalendarError),
    /// Persistence failed; nothing was reported as created.
    Store(StoreError),
}

impl EntryError {
    /// Stable code for logs and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CrossDay { .. } => "cross_day",
            Self::EndBeforeStart { .. } => "end_before_start",
            Self::InvalidTimestamp(_) => "invalid_timestamp",
            Self::Store(_) => "store_failed",
        }
    }
}

impl Display for EntryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CrossDay { .. } => write!(f, "Start and end date need to be in the same day"),
            Self::EndBeforeStart { .. } => write!(f, "End time cannot be earlier than start time"),
            Self::InvalidTimestamp(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "Failed to save task: {err}"),
        }
    }
}

impl Error for EntryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTimestamp(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for EntryError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<CalendarError> for EntryError {
    fn from(value: CalendarError) -> Self {
        Self::InvalidTimestamp(value)
    }
}

/// Validated creation path from raw input to a persisted task.
///
/// The guard is a plain flag: all calls are expected from one sequential
/// context, which is why the type is not `Sync`.
pub struct TaskEntryFlow<D: DayRepository, T: TaskRepository> {
    registry: DayRegistry<D>,
    store: TaskStore<T>,
    calendar: DayCalendar,
    in_flight: Cell<bool>,
}

impl<D: DayRepository, T: TaskRepository> TaskEntryFlow<D, T> {
    pub fn new(registry: DayRegistry<D>, store: TaskStore<T>, calendar: DayCalendar) -> Self {
        Self {
            registry,
            store,
            calendar,
            in_flight: Cell::new(false),
        }
    }

    /// Whether a submission is currently being processed.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Validates and persists one task.
    ///
    /// Returns `Ok(SubmitOutcome::Busy)` without validating when a previous
    /// submission has not returned yet.
    pub fn submit(&self, draft: &TaskDraft) -> Result<SubmitOutcome, EntryError> {
        let Some(_guard) = self.try_begin() else {
            debug!("event=task_submit module=service status=skipped reason=in_flight");
            return Ok(SubmitOutcome::Busy);
        };

        match self.create_task(draft) {
            Ok(submitted) => {
                info!(
                    "event=task_submit module=service status=ok task_id={} description_limit_reached={}",
                    submitted.task.id, submitted.description_limit_reached
                );
                Ok(SubmitOutcome::Created(submitted))
            }
            Err(err) => {
                warn!(
                    "event=task_submit module=service status=error error_code={} error={}",
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn create_task(&self, draft: &TaskDraft) -> Result<SubmittedTask, EntryError> {
        let start_day = self.calendar.day_key(draft.start_epoch_ms)?;
        let end_day = self.calendar.day_key(draft.end_epoch_ms)?;
        if start_day != end_day {
            return Err(EntryError::CrossDay { start_day, end_day });
        }
        if draft.end_epoch_ms < draft.start_epoch_ms {
            return Err(EntryError::EndBeforeStart {
                start: draft.start_epoch_ms,
                end: draft.end_epoch_ms,
            });
        }

        let description = clamp_description(&draft.description);
        let task = Task::new(
            start_day.clone(),
            draft.start_epoch_ms,
            draft.end_epoch_ms,
            description.text,
        )
        .map_err(StoreError::from)?;

        let mut container = self.registry.find_or_create(&start_day)?;
        self.store.append(&mut container, task.clone())?;

        Ok(SubmittedTask {
            task,
            description_limit_reached: description.limit_reached,
        })
    }

    fn try_begin(&self) -> Option<SubmitGuard<'_>> {
        if self.in_flight.replace(true) {
            return None;
        }
        Some(SubmitGuard {
            flag: &self.in_flight,
        })
    }
}

struct SubmitGuard<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
