use daytodo_core::db::open_db_in_memory;
use daytodo_core::{
    DayCalendar, DayKey, DayRegistry, DayView, EntryError, FixedClock, SqliteDayRepository,
    SqliteTaskRepository, StoreError, SubmitOutcome, SubmittedTask, TaskDraft, TaskEntryFlow,
    TaskStore, DESCRIPTION_LIMIT,
};
use rusqlite::Connection;

/// 2024-06-01T09:00:00Z
const JUN_1_0900: i64 = 1_717_232_400_000;
const MINUTE_MS: i64 = 60_000;

type Flow<'conn> = TaskEntryFlow<SqliteDayRepository<'conn>, SqliteTaskRepository<'conn>>;

fn flow(conn: &Connection) -> Flow<'_> {
    TaskEntryFlow::new(
        DayRegistry::new(SqliteDayRepository::try_new(conn).unwrap()),
        TaskStore::new(SqliteTaskRepository::try_new(conn).unwrap()),
        DayCalendar::utc(),
    )
}

fn draft(start: i64, end: i64, description: &str) -> TaskDraft {
    TaskDraft {
        start_epoch_ms: start,
        end_epoch_ms: end,
        description: description.to_string(),
    }
}

fn created(outcome: SubmitOutcome) -> SubmittedTask {
    match outcome {
        SubmitOutcome::Created(submitted) => submitted,
        SubmitOutcome::Busy => panic!("submission unexpectedly ignored"),
    }
}

fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn standup_scenario_end_to_end() {
    let conn = open_db_in_memory().unwrap();
    let flow = flow(&conn);
    let days = SqliteDayRepository::try_new(&conn).unwrap();
    let registry = DayRegistry::new(days);
    let store = TaskStore::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let view = DayView::new(days, DayCalendar::utc(), FixedClock(JUN_1_0900));

    let submitted = created(
        flow.submit(&draft(JUN_1_0900, JUN_1_0900 + 30 * MINUTE_MS, "Standup"))
            .unwrap(),
    );
    assert!(!submitted.task.is_completed);
    assert!(!submitted.description_limit_reached);

    let day = DayKey::new("Jun 1, 2024");
    let container = registry.find(&day).unwrap().expect("day container created");
    assert_eq!(container.tasks.len(), 1);
    assert_eq!(container.tasks[0].description, "Standup");

    let today: Vec<_> = view
        .tasks_for_today()
        .unwrap()
        .into_iter()
        .map(|task| task.description)
        .collect();
    assert_eq!(today, ["Standup"]);

    let mut task = submitted.task.clone();
    assert!(store.set_completed(&mut task, true).unwrap());
    assert!(view.tasks_for_today().unwrap()[0].is_completed);

    let mut container = registry.find(&day).unwrap().unwrap();
    assert!(store.delete(&mut container, task.id).unwrap());
    assert!(view.tasks_for_today().unwrap().is_empty());

    let remaining = registry.find(&day).unwrap().expect("day container survives");
    assert!(remaining.tasks.is_empty());
}

#[test]
fn cross_day_submission_fails_without_side_effects() {
    let conn = open_db_in_memory().unwrap();
    let flow = flow(&conn);

    let err = flow
        .submit(&draft(
            JUN_1_0900,
            JUN_1_0900 + 15 * 60 * MINUTE_MS,
            "Overnight",
        ))
        .unwrap_err();

    match err {
        EntryError::CrossDay { start_day, end_day } => {
            assert_eq!(start_day.as_str(), "Jun 1, 2024");
            assert_eq!(end_day.as_str(), "Jun 2, 2024");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(row_count(&conn, "days"), 0);
    assert_eq!(row_count(&conn, "tasks"), 0);
}

#[test]
fn cross_day_wins_over_reversed_window() {
    let conn = open_db_in_memory().unwrap();
    let flow = flow(&conn);

    let err = flow
        .submit(&draft(JUN_1_0900, JUN_1_0900 - 10 * 60 * MINUTE_MS, "x"))
        .unwrap_err();
    assert!(matches!(err, EntryError::CrossDay { .. }));
    assert_eq!(err.to_string(), "Start and end date need to be in the same day");
}

#[test]
fn reversed_window_on_same_day_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let flow = flow(&conn);

    let err = flow
        .submit(&draft(JUN_1_0900, JUN_1_0900 - 30 * MINUTE_MS, "x"))
        .unwrap_err();
    assert!(matches!(err, EntryError::EndBeforeStart { .. }));
    assert_eq!(err.code(), "end_before_start");
    assert_eq!(row_count(&conn, "days"), 0);
}

#[test]
fn overlong_description_is_stored_as_first_fifty_characters() {
    let conn = open_db_in_memory().unwrap();
    let flow = flow(&conn);
    let long: String = ('a'..='z').cycle().take(DESCRIPTION_LIMIT + 25).collect();

    let submitted = created(
        flow.submit(&draft(JUN_1_0900, JUN_1_0900 + MINUTE_MS, &long))
            .unwrap(),
    );

    let expected: String = long.chars().take(DESCRIPTION_LIMIT).collect();
    assert!(submitted.description_limit_reached);
    assert_eq!(submitted.task.description, expected);
    let stored: String = conn
        .query_row("SELECT description FROM tasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(stored, expected);
}

#[test]
fn second_submission_for_same_day_reuses_container() {
    let conn = open_db_in_memory().unwrap();
    let flow = flow(&conn);

    created(
        flow.submit(&draft(JUN_1_0900, JUN_1_0900 + MINUTE_MS, "one"))
            .unwrap(),
    );
    created(
        flow.submit(&draft(
            JUN_1_0900 + 60 * MINUTE_MS,
            JUN_1_0900 + 61 * MINUTE_MS,
            "two",
        ))
        .unwrap(),
    );

    assert_eq!(row_count(&conn, "days"), 1);
    assert_eq!(row_count(&conn, "tasks"), 2);
}

#[test]
fn store_failure_aborts_submission() {
    let conn = open_db_in_memory().unwrap();
    let flow = flow(&conn);
    conn.execute_batch("DROP INDEX idx_tasks_day_position; DROP TABLE tasks;")
        .unwrap();

    let err = flow
        .submit(&draft(JUN_1_0900, JUN_1_0900 + MINUTE_MS, "lost"))
        .unwrap_err();
    assert!(matches!(err, EntryError::Store(StoreError::Db(_))));
    assert_eq!(err.code(), "store_failed");
    assert!(!flow.is_in_flight());
}

#[test]
fn out_of_range_timestamp_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let flow = flow(&conn);

    let err = flow.submit(&draft(i64::MAX, i64::MAX, "x")).unwrap_err();
    assert!(matches!(err, EntryError::InvalidTimestamp(_)));
}
