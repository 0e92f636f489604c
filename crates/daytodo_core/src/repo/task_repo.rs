//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert, read, complete and delete task rows.
//! - Keep per-day insertion order in the `position` column.
//!
//! # Invariants
//! - A task row is only inserted under an existing day container.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Rows for one day are returned in insertion order (`position ASC`).

use crate::model::day::DayKey;
use crate::model::task::{Task, TaskId};
use crate::repo::schema::ensure_store_connection_ready;
use crate::repo::{StoreError, StoreResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    day,
    start_epoch_ms,
    end_epoch_ms,
    description,
    is_completed
FROM tasks";

/// Repository interface for task persistence.
pub trait TaskRepository {
    /// Appends a task to its day. The day container must already exist.
    fn insert_task(&self, task: &Task) -> StoreResult<()>;
    /// Loads one task by id.
    fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>>;
    /// Lists tasks of one day in insertion order.
    fn list_tasks_for_day(&self, day: &DayKey) -> StoreResult<Vec<Task>>;
    /// Persists the completion flag for one task.
    fn set_task_completed(&self, id: TaskId, completed: bool) -> StoreResult<()>;
    /// Deletes one task. Returns `false` when no such task exists.
    fn delete_task(&self, id: TaskId) -> StoreResult<bool>;
}

/// SQLite-backed task repository.
#[derive(Clone, Copy)]
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, task: &Task) -> StoreResult<()> {
        task.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !day_exists(&tx, &task.day)? {
            return Err(StoreError::DayNotFound(task.day.clone()));
        }

        let position = next_position(&tx, &task.day)?;
        tx.execute(
            "INSERT INTO tasks (
                uuid,
                day,
                start_epoch_ms,
                end_epoch_ms,
                description,
                is_completed,
                position
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                task.id.to_string(),
                task.day.as_str(),
                task.start_epoch_ms,
                task.end_epoch_ms,
                task.description.as_str(),
                bool_to_int(task.is_completed),
                position,
            ],
        )?;
        tx.commit()?;

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks_for_day(&self, day: &DayKey) -> StoreResult<Vec<Task>> {
        load_tasks_for_day(self.conn, day)
    }

    fn set_task_completed(&self, id: TaskId, completed: bool) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                is_completed = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), bool_to_int(completed)],
        )?;

        if changed == 0 {
            return Err(StoreError::TaskNotFound(id));
        }
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

pub(crate) fn load_tasks_for_day(conn: &Connection, day: &DayKey) -> StoreResult<Vec<Task>> {
    let mut stmt = conn.prepare(&format!(
        "{TASK_SELECT_SQL}
         WHERE day = ?1
         ORDER BY position ASC, uuid ASC;"
    ))?;
    let mut rows = stmt.query([day.as_str()])?;
    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(parse_task_row(row)?);
    }
    Ok(tasks)
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in tasks.uuid"))
    })?;

    let is_completed = match row.get::<_, i64>("is_completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid is_completed value `{other}` in tasks.is_completed"
            )));
        }
    };

    let task = Task {
        id,
        day: DayKey::new(row.get::<_, String>("day")?),
        start_epoch_ms: row.get("start_epoch_ms")?,
        end_epoch_ms: row.get("end_epoch_ms")?,
        description: row.get("description")?,
        is_completed,
    };
    task.validate()?;
    Ok(task)
}

fn day_exists(tx: &Transaction<'_>, day: &DayKey) -> StoreResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM days WHERE day = ?1);",
        [day.as_str()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn next_position(tx: &Transaction<'_>, day: &DayKey) -> StoreResult<i64> {
    let next = tx.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1
         FROM tasks
         WHERE day = ?1;",
        [day.as_str()],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
