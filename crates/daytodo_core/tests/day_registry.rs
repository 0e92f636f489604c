use daytodo_core::db::migrations::latest_version;
use daytodo_core::db::open_db_in_memory;
use daytodo_core::{
    DayKey, DayRegistry, DayRepository, SqliteDayRepository, SqliteTaskRepository, StoreError,
    Task, TaskRepository,
};
use rusqlite::Connection;

fn day_count(conn: &Connection, day: &str) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM days WHERE day = ?1;", [day], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn find_or_create_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let registry = DayRegistry::new(SqliteDayRepository::try_new(&conn).unwrap());
    let day = DayKey::new("Jun 1, 2024");

    let first = registry.find_or_create(&day).unwrap();
    let second = registry.find_or_create(&day).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.day, day);
    assert!(first.tasks.is_empty());
    assert_eq!(day_count(&conn, "Jun 1, 2024"), 1);
}

#[test]
fn find_or_create_returns_existing_tasks() {
    let conn = open_db_in_memory().unwrap();
    let days = SqliteDayRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let registry = DayRegistry::new(days);
    let day = DayKey::new("Jun 1, 2024");

    registry.find_or_create(&day).unwrap();
    let task = Task::new(day.clone(), 1_000, 2_000, "Standup").unwrap();
    tasks.insert_task(&task).unwrap();

    let container = registry.find_or_create(&day).unwrap();
    assert_eq!(container.tasks, vec![task]);
    assert_eq!(day_count(&conn, "Jun 1, 2024"), 1);
}

#[test]
fn find_does_not_create() {
    let conn = open_db_in_memory().unwrap();
    let registry = DayRegistry::new(SqliteDayRepository::try_new(&conn).unwrap());

    assert!(registry
        .find(&DayKey::new("Jun 1, 2024"))
        .unwrap()
        .is_none());
    assert_eq!(day_count(&conn, "Jun 1, 2024"), 0);
}

#[test]
fn day_keys_are_matched_by_exact_string() {
    let conn = open_db_in_memory().unwrap();
    let registry = DayRegistry::new(SqliteDayRepository::try_new(&conn).unwrap());

    registry.find_or_create(&DayKey::new("Jun 1, 2024")).unwrap();
    registry.find_or_create(&DayKey::new("Jun 2, 2024")).unwrap();

    assert_eq!(day_count(&conn, "Jun 1, 2024"), 1);
    assert_eq!(day_count(&conn, "Jun 2, 2024"), 1);
    assert!(registry
        .find(&DayKey::new("jun 1, 2024"))
        .unwrap()
        .is_none());
}

#[test]
fn blank_day_key_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let registry = DayRegistry::new(SqliteDayRepository::try_new(&conn).unwrap());

    let err = registry.find_or_create(&DayKey::new(" ")).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn delete_day_removes_owned_tasks_in_one_step() {
    let conn = open_db_in_memory().unwrap();
    let days = SqliteDayRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let day = DayKey::new("Jun 1, 2024");
    let other_day = DayKey::new("Jun 2, 2024");

    days.insert_day(&day).unwrap();
    days.insert_day(&other_day).unwrap();
    tasks
        .insert_task(&Task::new(day.clone(), 1_000, 2_000, "a").unwrap())
        .unwrap();
    tasks
        .insert_task(&Task::new(day.clone(), 3_000, 4_000, "b").unwrap())
        .unwrap();
    let survivor = Task::new(other_day.clone(), 1_000, 2_000, "c").unwrap();
    tasks.insert_task(&survivor).unwrap();

    assert_eq!(days.delete_day(&day).unwrap(), 2);
    assert!(days.find_day(&day).unwrap().is_none());
    assert!(tasks.list_tasks_for_day(&day).unwrap().is_empty());
    assert_eq!(tasks.list_tasks_for_day(&other_day).unwrap(), vec![survivor]);
}

#[test]
fn delete_unknown_day_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let days = SqliteDayRepository::try_new(&conn).unwrap();

    let err = days.delete_day(&DayKey::new("Jun 9, 2024")).unwrap_err();
    assert!(matches!(err, StoreError::DayNotFound(day) if day.as_str() == "Jun 9, 2024"));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteDayRepository::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTaskRepository::try_new(&conn);
    assert!(matches!(result, Err(StoreError::MissingRequiredTable("days"))));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE days (
            day TEXT PRIMARY KEY NOT NULL,
            created_at INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE tasks (
            uuid TEXT PRIMARY KEY NOT NULL,
            day TEXT NOT NULL,
            start_epoch_ms INTEGER NOT NULL,
            end_epoch_ms INTEGER NOT NULL,
            description TEXT NOT NULL,
            is_completed INTEGER NOT NULL DEFAULT 0
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteDayRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredColumn {
            table: "tasks",
            column: "position"
        })
    ));
}
