//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the day screen, task entry and per-task actions to Dart via FRB.
//! - Turn every core failure into a response envelope with a message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Store failures are reported with `ok=false`, never dropped.
//! - `feedback_ms` is a display hint only; no core state waits on it.

use daytodo_core::db::open_db;
use daytodo_core::{
    clamp_description, core_version as core_version_inner, description_limit_message,
    init_logging as init_logging_inner, ping as ping_inner, CoreConfig, DayRegistry, DayView,
    SqliteDayRepository, SqliteTaskRepository, StoreError, SubmitOutcome, SystemClock, Task,
    TaskDraft, TaskEntryFlow, TaskId, TaskStore,
};
use log::warn;
use rusqlite::Connection;
use std::sync::OnceLock;
use uuid::Uuid;

const SUCCESS_FEEDBACK_MS: u32 = 1_000;
const ERROR_FEEDBACK_MS: u32 = 2_000;
static CORE_CONFIG: OnceLock<Result<CoreConfig, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Clamped description state for the task entry field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionInputResponse {
    /// Text to write back into the field.
    pub text: String,
    /// Whether the character limit has been reached.
    pub limit_reached: bool,
    /// Advisory text; empty while under the limit.
    pub message: String,
}

/// One row of the day screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub task_id: String,
    pub start_epoch_ms: i64,
    pub end_epoch_ms: i64,
    /// Display label such as `9:00 AM-9:30 AM`.
    pub time_range: String,
    pub description: String,
    pub is_completed: bool,
}

/// Day screen envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTasksResponse {
    /// Day key of the listed day; empty on failure.
    pub day: String,
    /// Tasks sorted by start time.
    pub items: Vec<TaskItem>,
    pub message: String,
}

/// Envelope for task create/complete/delete actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected task ID, when known.
    pub task_id: Option<String>,
    /// Human-readable message for the success/error banner.
    pub message: String,
    /// Suggested banner display time in milliseconds.
    pub feedback_ms: u32,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: TaskId) -> Self {
        Self {
            ok: true,
            task_id: Some(task_id.to_string()),
            message: message.into(),
            feedback_ms: SUCCESS_FEEDBACK_MS,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
            feedback_ms: ERROR_FEEDBACK_MS,
        }
    }
}

/// Clamps description input as the user types.
///
/// # FFI contract
/// - Sync call, no I/O.
#[flutter_rust_bridge::frb(sync)]
pub fn describe_input(text: String) -> DescriptionInputResponse {
    let clamped = clamp_description(text.as_str());
    let message = if clamped.limit_reached {
        description_limit_message()
    } else {
        String::new()
    };
    DescriptionInputResponse {
        text: clamped.text,
        limit_reached: clamped.limit_reached,
        message,
    }
}

/// Creates a task through the validated entry flow.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Cross-day input and store failures return `ok=false` with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn add_task(start_epoch_ms: i64, end_epoch_ms: i64, description: String) -> TaskActionResponse {
    let draft = TaskDraft {
        start_epoch_ms,
        end_epoch_ms,
        description,
    };
    let result = with_connection(|conn, config| {
        let flow = TaskEntryFlow::new(
            DayRegistry::new(SqliteDayRepository::try_new(conn).map_err(store_message)?),
            TaskStore::new(SqliteTaskRepository::try_new(conn).map_err(store_message)?),
            config.calendar(),
        );
        flow.submit(&draft).map_err(|err| err.to_string())
    });

    match result {
        Ok(SubmitOutcome::Created(submitted)) => {
            TaskActionResponse::success("Task added.", submitted.task.id)
        }
        Ok(SubmitOutcome::Busy) => TaskActionResponse {
            ok: false,
            task_id: None,
            message: "Another task is still being saved.".to_string(),
            feedback_ms: 0,
        },
        Err(message) => action_failure("add_task", message),
    }
}

/// Lists today's tasks ordered by start time.
///
/// # FFI contract
/// - Sync call, DB-backed execution, read-only.
/// - Returns an empty list when nothing is scheduled today.
#[flutter_rust_bridge::frb(sync)]
pub fn today_tasks() -> DayTasksResponse {
    let result = with_connection(|conn, config| {
        let view = DayView::new(
            SqliteDayRepository::try_new(conn).map_err(store_message)?,
            config.calendar(),
            SystemClock,
        );
        let day = view.today().map_err(|err| err.to_string())?;
        let tasks = view.tasks_for_day(&day).map_err(store_message)?;
        let items = tasks
            .iter()
            .map(|task| to_task_item(task, view.calendar()))
            .collect::<Result<Vec<_>, String>>()?;
        Ok((day, items))
    });

    match result {
        Ok((day, items)) => {
            let message = if items.is_empty() {
                "No tasks for today".to_string()
            } else {
                format!("{} task(s) today.", items.len())
            };
            DayTasksResponse {
                day: day.to_string(),
                items,
                message,
            }
        }
        Err(message) => {
            warn!("event=ffi_call module=ffi status=error op=today_tasks");
            DayTasksResponse {
                day: String::new(),
                items: Vec::new(),
                message: format!("today_tasks failed: {message}"),
            }
        }
    }
}

/// Marks a task complete or incomplete.
///
/// # FFI contract
/// - Requesting the current state succeeds without a write.
/// - Unknown task IDs return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn set_task_completed(task_id: String, completed: bool) -> TaskActionResponse {
    let id = match parse_task_id(task_id.as_str()) {
        Ok(id) => id,
        Err(message) => return action_failure("set_task_completed", message),
    };

    let result = with_connection(|conn, _| {
        let store = TaskStore::new(SqliteTaskRepository::try_new(conn).map_err(store_message)?);
        let mut task = store
            .get(id)
            .map_err(store_message)?
            .ok_or_else(|| store_message(StoreError::TaskNotFound(id)))?;
        store
            .set_completed(&mut task, completed)
            .map_err(store_message)
    });

    match result {
        Ok(true) if completed => TaskActionResponse::success("Task marked as complete.", id),
        Ok(true) => TaskActionResponse::success("Task marked as incomplete.", id),
        Ok(false) => TaskActionResponse::success("Task already in requested state.", id),
        Err(message) => action_failure("set_task_completed", message),
    }
}

/// Erases a task from its day.
///
/// # FFI contract
/// - Deleting an already-removed task succeeds as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_task(task_id: String) -> TaskActionResponse {
    let id = match parse_task_id(task_id.as_str()) {
        Ok(id) => id,
        Err(message) => return action_failure("delete_task", message),
    };

    let result = with_connection(|conn, _| {
        let registry =
            DayRegistry::new(SqliteDayRepository::try_new(conn).map_err(store_message)?);
        let store = TaskStore::new(SqliteTaskRepository::try_new(conn).map_err(store_message)?);
        let Some(task) = store.get(id).map_err(store_message)? else {
            return Ok(false);
        };
        let mut container = registry
            .find(&task.day)
            .map_err(store_message)?
            .ok_or_else(|| store_message(StoreError::DayNotFound(task.day.clone())))?;
        store.delete(&mut container, id).map_err(store_message)
    });

    match result {
        Ok(true) => TaskActionResponse::success("Task erased.", id),
        Ok(false) => TaskActionResponse::success("Task already removed.", id),
        Err(message) => action_failure("delete_task", message),
    }
}

fn resolve_config() -> Result<CoreConfig, String> {
    CORE_CONFIG
        .get_or_init(|| CoreConfig::from_env().map_err(|err| err.to_string()))
        .clone()
}

fn with_connection<T>(
    f: impl FnOnce(&Connection, &CoreConfig) -> Result<T, String>,
) -> Result<T, String> {
    let config = resolve_config()?;
    let conn = open_db(&config.db_path).map_err(|err| format!("task DB open failed: {err}"))?;
    f(&conn, &config)
}

fn parse_task_id(value: &str) -> Result<TaskId, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("invalid task_id `{value}`"))
}

fn store_message(err: StoreError) -> String {
    err.to_string()
}

fn action_failure(op: &'static str, message: String) -> TaskActionResponse {
    warn!("event=ffi_call module=ffi status=error op={op}");
    TaskActionResponse::failure(format!("{op} failed: {message}"))
}

fn to_task_item(task: &Task, calendar: &daytodo_core::DayCalendar) -> Result<TaskItem, String> {
    let time_range = calendar
        .time_range_label(task.start_epoch_ms, task.end_epoch_ms)
        .map_err(|err| err.to_string())?;
    Ok(TaskItem {
        task_id: task.id.to_string(),
        start_epoch_ms: task.start_epoch_ms,
        end_epoch_ms: task.end_epoch_ms,
        time_range,
        description: task.description.clone(),
        is_completed: task.is_completed,
    })
}
