//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define persistence contracts for day containers and tasks.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Task writes call `Task::validate()` before SQL mutations.
//! - Every store failure surfaces as `StoreError`; nothing is swallowed here.

use crate::db::DbError;
use crate::model::day::DayKey;
use crate::model::task::{TaskId, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod day_repo;
mod schema;
pub mod task_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence-layer failure for day and task operations.
#[derive(Debug)]
pub enum StoreError {
    /// Record violates model invariants.
    Validation(TaskValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Target day container does not exist.
    DayNotFound(DayKey),
    /// Task belongs to a different day than the container it was added to.
    DayMismatch {
        task_day: DayKey,
        container_day: DayKey,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted into a valid record.
    InvalidData(String),
    /// Write succeeded but read-back disagrees.
    InconsistentState(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::DayNotFound(day) => write!(f, "day not found: {day}"),
            Self::DayMismatch {
                task_day,
                container_day,
            } => write!(
                f,
                "task for `{task_day}` cannot be added to day `{container_day}`"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "task store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "task store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "task store requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task store: {details}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
