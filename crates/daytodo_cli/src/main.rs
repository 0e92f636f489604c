//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `daytodo_core` linkage.
//! - Print today's tasks from the configured database for quick local checks.

use daytodo_core::db::open_db;
use daytodo_core::{
    init_logging_from_config, CoreConfig, DayView, SqliteDayRepository, SystemClock,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("daytodo_core ping={}", daytodo_core::ping());
    println!("daytodo_core version={}", daytodo_core::core_version());

    match print_today() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("daytodo_core error={message}");
            ExitCode::FAILURE
        }
    }
}

fn print_today() -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if init_logging_from_config(&config)? {
        println!("daytodo_core logging={}", config.log_level);
    }
    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let repo = SqliteDayRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let view = DayView::new(repo, config.calendar(), SystemClock);

    let day = view.today().map_err(|err| err.to_string())?;
    let tasks = view.tasks_for_day(&day).map_err(|err| err.to_string())?;
    println!("daytodo_core today={day} tasks={}", tasks.len());
    for task in &tasks {
        let range = view
            .calendar()
            .time_range_label(task.start_epoch_ms, task.end_epoch_ms)
            .map_err(|err| err.to_string())?;
        let mark = if task.is_completed { "x" } else { " " };
        println!("[{mark}] {range} {}", task.description);
    }
    Ok(())
}
