use daytodo_core::{DayKey, Task, TaskValidationError, DESCRIPTION_LIMIT};
use uuid::Uuid;

fn day() -> DayKey {
    DayKey::new("Jun 1, 2024")
}

#[test]
fn task_new_sets_defaults() {
    let task = Task::new(day(), 1_000, 2_000, "Standup").unwrap();

    assert!(!task.id.is_nil());
    assert_eq!(task.day, day());
    assert_eq!(task.description, "Standup");
    assert!(!task.is_completed);
}

#[test]
fn task_rejects_nil_id_and_reversed_window() {
    let err = Task::with_id(Uuid::nil(), day(), 0, 1, "x").unwrap_err();
    assert_eq!(err, TaskValidationError::NilId);

    let err = Task::new(day(), 2_000, 1_000, "x").unwrap_err();
    assert_eq!(
        err,
        TaskValidationError::InvalidTimeWindow {
            start: 2_000,
            end: 1_000
        }
    );
}

#[test]
fn task_rejects_description_over_limit_and_blank_day() {
    let err = Task::new(day(), 0, 1, "y".repeat(DESCRIPTION_LIMIT + 1)).unwrap_err();
    assert_eq!(
        err,
        TaskValidationError::DescriptionTooLong {
            chars: DESCRIPTION_LIMIT + 1,
            limit: DESCRIPTION_LIMIT
        }
    );

    let err = Task::new(DayKey::new("  "), 0, 1, "x").unwrap_err();
    assert_eq!(err, TaskValidationError::BlankDay);
}

#[test]
fn task_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut task = Task::with_id(id, day(), 1_717_232_400_000, 1_717_234_200_000, "Standup")
        .unwrap();
    task.is_completed = true;

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["day"], "Jun 1, 2024");
    assert_eq!(json["start_epoch_ms"], 1_717_232_400_000_i64);
    assert_eq!(json["end_epoch_ms"], 1_717_234_200_000_i64);
    assert_eq!(json["description"], "Standup");
    assert_eq!(json["is_completed"], true);

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn deserialize_rejects_invalid_time_window() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "day": "Jun 1, 2024",
        "start_epoch_ms": 200,
        "end_epoch_ms": 100,
        "description": "bad",
        "is_completed": false
    });

    let err = serde_json::from_value::<Task>(value).unwrap_err();
    assert!(
        err.to_string()
            .contains("end_epoch_ms (100) must be >= start_epoch_ms (200)"),
        "unexpected error: {err}"
    );
}
