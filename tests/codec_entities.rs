use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use tasktally::{
    codec::Codec,
    model::{
        id::Id,
        project::Project,
        todo::{TaskTime, Timer, Todo},
        Model,
    },
};

const PROJECT_ID: &str = "V1StGXR8_Z5jdHi6B-myT";
const TODO_ID: &str = "TODO_1_8_Z5jdHi6B-myT";

fn project_json() -> serde_json::Value {
    json!({
        "id": PROJECT_ID,
        "title": "Write book",
        "description": "About lighthouses",
        "dueDate": "1981-10-12T00:00:00.000Z",
    })
}

fn todo_json() -> serde_json::Value {
    json!({
        "id": TODO_ID,
        "projectId": PROJECT_ID,
        "title": "Prologue",
        "taskTime": [
            {
                "start": "1981-10-12T00:00:00.000Z",
                "end": "1981-10-12T00:01:00.000Z",
                "duration": 60000,
            },
            {
                "start": "1981-10-12T10:00:00.000Z",
                "end": "1981-10-12T10:00:30.500Z",
                "duration": 30500,
            },
        ],
        "totalDuration": 90500,
        "lastWorked": "1981-10-12T10:00:30.500Z",
        "taskStartTime": "1981-10-13T08:00:00.000Z",
    })
}

#[test]
fn test_project_round_trip() -> Result<()> {
    let project = Project::decode(&project_json())?;
    assert_eq!(project.id.as_str(), PROJECT_ID);
    assert_eq!(
        project.due_date,
        Some(Utc.with_ymd_and_hms(1981, 10, 12, 0, 0, 0).unwrap())
    );
    assert_eq!(project.encode()?, project_json());
    assert_eq!(Project::decode(&project.encode()?)?, project);
    Ok(())
}

#[test]
fn test_project_without_due_date_encodes_null() -> Result<()> {
    let value = json!({ "id": PROJECT_ID, "title": "X", "description": "Y" });
    let project = Project::decode(&value)?;
    assert_eq!(project.due_date, None);
    assert_eq!(
        project.encode()?,
        json!({ "id": PROJECT_ID, "title": "X", "description": "Y", "dueDate": null })
    );
    Ok(())
}

#[test]
fn test_project_plain_date_is_midnight_utc() -> Result<()> {
    let mut value = project_json();
    value["dueDate"] = json!("2019-08-03");
    let project = Project::decode(&value)?;
    assert_eq!(
        project.due_date,
        Some(Utc.with_ymd_and_hms(2019, 8, 3, 0, 0, 0).unwrap())
    );
    Ok(())
}

#[test]
fn test_project_malformed_due_date_is_an_error() {
    let mut value = project_json();
    value["dueDate"] = json!("nope");
    let error = Project::decode(&value).unwrap_err();
    assert_eq!(error.path, "dueDate");
    assert_eq!(
        error.message,
        "invalid value: string \"nope\", expected ISO date string"
    );
}

#[test]
fn test_project_missing_title_is_an_error() {
    let value = json!({ "id": PROJECT_ID, "description": "Y" });
    let error = Project::decode(&value).unwrap_err();
    assert_eq!(error.path, "");
    assert_eq!(error.message, "missing field `title`");
}

#[test]
fn test_project_invalid_id_is_an_error() {
    let mut value = project_json();
    value["id"] = json!("short");
    let error = Project::decode(&value).unwrap_err();
    assert_eq!(error.path, "id");
    assert!(error.message.contains("nanoid string"), "{}", error.message);
}

#[test]
fn test_task_time_derives_duration() -> Result<()> {
    let value = json!({
        "start": "1981-10-12T00:00:00.000Z",
        "end": "1981-10-12T00:01:00.000Z",
    });
    let task_time = TaskTime::decode(&value)?;
    assert_eq!(task_time.duration(), Duration::milliseconds(60000));
    assert_eq!(task_time.encode()?["duration"], json!(60000));
    Ok(())
}

#[test]
fn test_task_time_ignores_stored_duration() -> Result<()> {
    let value = json!({
        "start": "1981-10-12T00:00:00.000Z",
        "end": "1981-10-12T00:01:00.000Z",
        "duration": "five",
    });
    assert_eq!(
        TaskTime::decode(&value)?.duration(),
        Duration::milliseconds(60000)
    );
    Ok(())
}

#[test]
fn test_task_time_end_before_start_is_rejected() {
    let value = json!({
        "start": "1981-10-12T00:01:00.000Z",
        "end": "1981-10-12T00:00:00.000Z",
    });
    let error = TaskTime::decode(&value).unwrap_err();
    assert_eq!(error.path, "end");
}

#[test]
fn test_todo_round_trip() -> Result<()> {
    let todo = Todo::decode(&todo_json())?;
    assert_eq!(todo.title, "Prologue");
    assert_eq!(todo.task_time().len(), 2);
    assert_eq!(todo.total_duration(), Duration::milliseconds(90500));
    assert_eq!(
        todo.timer(),
        Timer::Running {
            since: Utc.with_ymd_and_hms(1981, 10, 13, 8, 0, 0).unwrap()
        }
    );
    assert_eq!(todo.encode()?, todo_json());
    assert_eq!(Todo::decode(&todo.encode()?)?, todo);
    Ok(())
}

#[test]
fn test_todo_optional_fields_are_omitted() -> Result<()> {
    let mut value = todo_json();
    let object = value.as_object_mut().unwrap();
    object.remove("taskStartTime");
    object.insert("lastWorked".into(), json!(null));

    let todo = Todo::decode(&value)?;
    assert!(!todo.is_running());
    assert_eq!(todo.last_worked, None);

    let encoded = todo.encode()?;
    assert!(encoded.get("taskStartTime").is_none());
    assert!(encoded.get("lastWorked").is_none());
    Ok(())
}

#[test]
fn test_todo_mismatched_total_is_recomputed() -> Result<()> {
    let mut value = todo_json();
    value["totalDuration"] = json!(1);
    let todo = Todo::decode(&value)?;
    assert_eq!(todo.total_duration(), Duration::milliseconds(90500));
    assert_eq!(todo.encode()?["totalDuration"], json!(90500));
    Ok(())
}

#[test]
fn test_todo_total_duration_must_be_a_number() {
    let mut value = todo_json();
    value["totalDuration"] = json!("90500");
    let error = Todo::decode(&value).unwrap_err();
    assert_eq!(error.path, "totalDuration");
    assert!(error.message.contains("expected integer milliseconds"));
}

#[test]
fn test_todo_total_duration_out_of_range_is_an_error() {
    let mut value = todo_json();
    value["totalDuration"] = json!(i64::MIN);
    let error = Todo::decode(&value).unwrap_err();
    assert_eq!(error.path, "totalDuration");
    assert!(error.message.starts_with("invalid value"), "{}", error.message);
}

#[test]
fn test_todo_intervals_overflowing_the_total_are_an_error() {
    let mut value = todo_json();
    let interval = json!({
        "start": "-262000-01-01T00:00:00.000Z",
        "end": "+262000-01-01T00:00:00.000Z",
    });
    value["taskTime"] = json!(vec![interval; 600]);
    let error = Todo::decode(&value).unwrap_err();
    assert_eq!(error.path, "taskTime");
}

#[test]
fn test_todo_bad_interval_reports_index() {
    let mut value = todo_json();
    value["taskTime"][1]["start"] = json!(12);
    let error = Todo::decode(&value).unwrap_err();
    assert_eq!(error.path, "taskTime[1].start");
}

#[test]
fn test_empty_model() -> Result<()> {
    let value = json!({ "projects": [], "todos": [], "selectedProject": null });
    let model = Model::decode(&value)?;
    assert_eq!(model, Model::default());
    assert_eq!(model.encode()?, value);
    Ok(())
}

#[test]
fn test_model_round_trip_drops_unknown_keys() -> Result<()> {
    let value = json!({
        "projects": [project_json()],
        "todos": [todo_json()],
        "selectedProject": project_json(),
        "deleteOp": { "project": PROJECT_ID },
    });
    let model = Model::decode(&value)?;
    assert_eq!(model.selected_project, Some(Id::parse(PROJECT_ID)?));
    assert_eq!(model.delete_op, None);

    let encoded = model.encode()?;
    assert!(encoded.get("deleteOp").is_none());
    assert_eq!(encoded["selectedProject"], project_json());
    assert_eq!(Model::decode(&encoded)?, model);
    Ok(())
}

#[test]
fn test_model_unknown_selection_is_dropped() -> Result<()> {
    let mut stray = project_json();
    stray["id"] = json!("OTHER_8_Z5jdHi6B-myT0");
    let value = json!({
        "projects": [project_json()],
        "todos": [],
        "selectedProject": stray,
    });
    assert_eq!(Model::decode(&value)?.selected_project, None);
    Ok(())
}

#[test]
fn test_model_broken_selection_is_dropped() -> Result<()> {
    let value = json!({
        "projects": [project_json()],
        "todos": [],
        "selectedProject": { "id": 12 },
    });
    assert_eq!(Model::decode(&value)?.selected_project, None);
    Ok(())
}

#[test]
fn test_model_error_path_points_into_collections() {
    let mut project = project_json();
    project["dueDate"] = json!("nope");
    let value = json!({ "projects": [project], "todos": [] });
    let error = Model::decode(&value).unwrap_err();
    assert_eq!(
        error.to_string(),
        "at projects[0].dueDate: invalid value: string \"nope\", expected ISO date string"
    );
}
