//! Day container repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Look up and create per-day containers keyed by day string.
//! - Delete a container together with every task it owns.
//!
//! # Invariants
//! - At most one container row exists per distinct day key.
//! - Containers are returned with their tasks in insertion order.
//! - Deleting a container removes its tasks in the same transaction.

use crate::model::day::{DayContainer, DayKey};
use crate::model::task::TaskValidationError;
use crate::repo::schema::ensure_store_connection_ready;
use crate::repo::task_repo::load_tasks_for_day;
use crate::repo::{StoreError, StoreResult};
use log::info;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};

/// Repository interface for day containers.
pub trait DayRepository {
    /// Loads one container with its tasks, if present.
    fn find_day(&self, day: &DayKey) -> StoreResult<Option<DayContainer>>;
    /// Creates an empty container. Returns `false` when it already existed.
    fn insert_day(&self, day: &DayKey) -> StoreResult<bool>;
    /// Deletes a container and all owned tasks; returns deleted task count.
    fn delete_day(&self, day: &DayKey) -> StoreResult<usize>;
}

/// SQLite-backed day repository.
#[derive(Clone, Copy)]
pub struct SqliteDayRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDayRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl DayRepository for SqliteDayRepository<'_> {
    fn find_day(&self, day: &DayKey) -> StoreResult<Option<DayContainer>> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT day FROM days WHERE day = ?1;",
                [day.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match found {
            None => Ok(None),
            Some(value) => {
                let key = DayKey::new(value);
                let tasks = load_tasks_for_day(self.conn, &key)?;
                Ok(Some(DayContainer { day: key, tasks }))
            }
        }
    }

    fn insert_day(&self, day: &DayKey) -> StoreResult<bool> {
        if day.as_str().trim().is_empty() {
            return Err(StoreError::Validation(TaskValidationError::BlankDay));
        }

        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO days (day) VALUES (?1);",
            [day.as_str()],
        )?;
        Ok(inserted > 0)
    }

    fn delete_day(&self, day: &DayKey) -> StoreResult<usize> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let removed_tasks = tx.execute("DELETE FROM tasks WHERE day = ?1;", [day.as_str()])?;
        let removed_days = tx.execute("DELETE FROM days WHERE day = ?1;", [day.as_str()])?;
        if removed_days == 0 {
            return Err(StoreError::DayNotFound(day.clone()));
        }
        tx.commit()?;

        info!(
            "event=day_delete module=repo status=ok removed_tasks={}",
            removed_tasks
        );
        Ok(removed_tasks)
    }
}
