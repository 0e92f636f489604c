//! Core domain logic for the daily task list.
//! This crate is the single source of truth for day/task invariants.

pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::{CalendarError, CalendarZone, Clock, DayCalendar, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::day::{DayContainer, DayKey};
pub use model::task::{
    clamp_description, description_limit_message, ClampedDescription, Task, TaskId,
    TaskValidationError, DESCRIPTION_LIMIT,
};
pub use repo::day_repo::{DayRepository, SqliteDayRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{StoreError, StoreResult};
pub use service::day_registry::DayRegistry;
pub use service::day_view::{DayView, DayViewError};
pub use service::entry_flow::{EntryError, SubmitOutcome, SubmittedTask, TaskDraft, TaskEntryFlow};
pub use service::task_store::TaskStore;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
