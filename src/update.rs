//! The reducer. [update] computes the next [Model] from the current one and a [Message]; it
//! performs no I/O and reads no clock, "now" is handed in by the caller.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::{
    model::{id::Id, project::Project, todo::Todo, DeleteOp, Model},
    utils::time::to_millis,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    AddProject(Project),
    UpdateProject {
        id: Id,
        title: Option<String>,
        description: Option<String>,
        /// `Some(None)` clears the due date.
        due_date: Option<Option<DateTime<Utc>>>,
    },
    SelectProject(Id),
    DeleteProject(Id),
    AddTodo(Todo),
    UpdateTodo {
        id: Id,
        title: String,
    },
    DeleteTodo(Id),
    TimerStart(Id),
    TimerStop(Id),
    TimerCancel(Id),
    RequestDelete(DeleteOp),
    CancelDelete,
    ConfirmDelete,
}

pub fn update(mut model: Model, message: Message, now: DateTime<Utc>) -> Model {
    debug!("update: {message:?}");
    // Everything the model stores is kept at the millisecond precision of the state file.
    let now = to_millis(now);
    match message {
        Message::AddProject(mut project) => {
            if model.project(&project.id).is_some() {
                warn!("Project {} already exists", project.id);
                return model;
            }
            project.due_date = project.due_date.map(to_millis);
            model.selected_project = Some(project.id.clone());
            model.projects.push(project);
            model.projects.sort_by(|a, b| a.title.cmp(&b.title));
        }
        Message::UpdateProject {
            id,
            title,
            description,
            due_date,
        } => {
            let Some(project) = model.projects.iter_mut().find(|p| p.id == id) else {
                warn!("Can't update unknown project {id}");
                return model;
            };
            if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
                project.title = title;
            }
            if let Some(description) = description {
                project.description = description;
            }
            if let Some(due_date) = due_date {
                project.due_date = due_date.map(to_millis);
            }
        }
        Message::SelectProject(id) => {
            if model.project(&id).is_some() {
                model.selected_project = Some(id);
            } else {
                warn!("Can't select unknown project {id}");
            }
        }
        Message::DeleteProject(id) => delete_project(&mut model, &id),
        Message::AddTodo(mut todo) => {
            if model.project(&todo.project_id).is_none() {
                warn!("Can't add todo to unknown project {}", todo.project_id);
            } else if model.todo(&todo.id).is_some() {
                warn!("Todo {} already exists", todo.id);
            } else {
                todo.last_worked = todo.last_worked.map(to_millis);
                model.todos.push(todo);
            }
        }
        Message::UpdateTodo { id, title } => {
            match model.todos.iter_mut().find(|todo| todo.id == id) {
                Some(todo) if !title.trim().is_empty() => todo.title = title,
                Some(_) => (),
                None => warn!("Can't update unknown todo {id}"),
            }
        }
        Message::DeleteTodo(id) => delete_todo(&mut model, &id),
        Message::TimerStart(id) => start_timer(&mut model.todos, &id, now),
        Message::TimerStop(id) => {
            if let Some(todo) = model.todos.iter_mut().find(|todo| todo.id == id) {
                todo.stop(now);
            }
        }
        Message::TimerCancel(id) => {
            if let Some(todo) = model.todos.iter_mut().find(|todo| todo.id == id) {
                todo.cancel();
            }
        }
        Message::RequestDelete(op) => model.delete_op = Some(op),
        Message::CancelDelete => model.delete_op = None,
        Message::ConfirmDelete => match model.delete_op.take() {
            Some(DeleteOp::Project(id)) => delete_project(&mut model, &id),
            Some(DeleteOp::Todo(id)) => delete_todo(&mut model, &id),
            None => debug!("Nothing to delete"),
        },
    }
    model
}

/// Only one timer runs at a time: every other running timer is stopped (and its interval
/// recorded) before the requested one starts.
fn start_timer(todos: &mut [Todo], id: &Id, now: DateTime<Utc>) {
    if !todos.iter().any(|todo| todo.id == *id) {
        warn!("Can't start timer of unknown todo {id}");
        return;
    }
    for todo in todos.iter_mut() {
        if todo.id == *id {
            todo.start(now);
        } else {
            todo.stop(now);
        }
    }
}

fn delete_project(model: &mut Model, id: &Id) {
    model.projects.retain(|project| project.id != *id);
    model.todos.retain(|todo| todo.project_id != *id);
    if model.selected_project.as_ref() == Some(id) {
        model.selected_project = model.projects.first().map(|project| project.id.clone());
    }
    model.delete_op = None;
}

fn delete_todo(model: &mut Model, id: &Id) {
    model.todos.retain(|todo| todo.id != *id);
    model.delete_op = None;
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::{
        codec::Codec,
        model::{
            id::Id,
            project::Project,
            todo::{Timer, Todo},
            DeleteOp, Model,
        },
    };

    use super::{update, Message};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 10, 12, 9, 0, 0).unwrap()
    }

    fn id(value: &str) -> Id {
        Id::parse(value).unwrap()
    }

    fn project_a() -> Project {
        Project::new(id("project_a_xxxxxxxxxxx"), "Alpha")
    }

    fn project_b() -> Project {
        Project::new(id("project_b_xxxxxxxxxxx"), "Beta")
    }

    fn todo(todo_id: &str, project: &Project) -> Todo {
        Todo::new(id(todo_id), project.id.clone(), "todo")
    }

    fn model() -> Model {
        let a = project_a();
        let b = project_b();
        Model {
            todos: vec![
                todo("todo_a1_xxxxxxxxxxxxx", &a),
                todo("todo_a2_xxxxxxxxxxxxx", &a),
                todo("todo_b1_xxxxxxxxxxxxx", &b),
            ],
            projects: vec![a.clone(), b],
            selected_project: Some(a.id),
            delete_op: None,
        }
    }

    #[test]
    fn test_add_project_sorts_and_selects() {
        let model = model();
        let new = Project::new(id("project_0_xxxxxxxxxxx"), "Aardvark");
        let model = update(model, Message::AddProject(new.clone()), now());
        let titles = model
            .projects
            .iter()
            .map(|p| p.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["Aardvark", "Alpha", "Beta"]);
        assert_eq!(model.selected_project, Some(new.id));
    }

    #[test]
    fn test_update_project_fields() {
        let due = Some(now());
        let model = update(
            model(),
            Message::UpdateProject {
                id: project_a().id,
                title: Some("Renamed".into()),
                description: Some("Notes".into()),
                due_date: Some(due),
            },
            now(),
        );
        let project = model.project(&project_a().id).unwrap();
        assert_eq!(project.title, "Renamed");
        assert_eq!(project.description, "Notes");
        assert_eq!(project.due_date, due);

        let model = update(
            model,
            Message::UpdateProject {
                id: project_a().id,
                title: Some("  ".into()),
                description: None,
                due_date: Some(None),
            },
            now(),
        );
        let project = model.project(&project_a().id).unwrap();
        assert_eq!(project.title, "Renamed");
        assert_eq!(project.description, "Notes");
        assert_eq!(project.due_date, None);
    }

    #[test]
    fn test_select_unknown_project_is_noop() {
        let before = model();
        let after = update(
            before.clone(),
            Message::SelectProject(id("project_z_xxxxxxxxxxx")),
            now(),
        );
        assert_eq!(after, before);

        let after = update(before, Message::SelectProject(project_b().id), now());
        assert_eq!(after.selected_project, Some(project_b().id));
    }

    #[test]
    fn test_add_todo_requires_project() {
        let orphan = Todo::new(
            id("todo_orphan_xxxxxxxxx"),
            id("project_z_xxxxxxxxxxx"),
            "orphan",
        );
        let before = model();
        let after = update(before.clone(), Message::AddTodo(orphan), now());
        assert_eq!(after, before);

        let fresh = todo("todo_new_xxxxxxxxxxxx", &project_b());
        let after = update(before, Message::AddTodo(fresh.clone()), now());
        assert_eq!(after.todos.last(), Some(&fresh));
    }

    #[test]
    fn test_update_todo_title() {
        let todo_id = id("todo_a1_xxxxxxxxxxxxx");
        let model = update(
            model(),
            Message::UpdateTodo {
                id: todo_id.clone(),
                title: "Write docs".into(),
            },
            now(),
        );
        assert_eq!(model.todo(&todo_id).unwrap().title, "Write docs");
    }

    #[test]
    fn test_timer_start_stops_other_timers() {
        let first = id("todo_a1_xxxxxxxxxxxxx");
        let second = id("todo_b1_xxxxxxxxxxxxx");

        let model = update(model(), Message::TimerStart(first.clone()), now());
        assert!(model.todo(&first).unwrap().is_running());

        let later = now() + Duration::minutes(10);
        let model = update(model, Message::TimerStart(second.clone()), later);

        let first = model.todo(&first).unwrap();
        assert!(!first.is_running());
        assert_eq!(first.total_duration(), Duration::minutes(10));
        assert_eq!(
            model.todo(&second).unwrap().timer(),
            Timer::Running { since: later }
        );
        assert_eq!(model.running_todos().count(), 1);
    }

    #[test]
    fn test_timer_start_on_running_keeps_start() {
        let todo_id = id("todo_a1_xxxxxxxxxxxxx");
        let model = update(model(), Message::TimerStart(todo_id.clone()), now());
        let before = model.clone();
        let after = update(
            model,
            Message::TimerStart(todo_id),
            now() + Duration::minutes(5),
        );
        assert_eq!(after, before);
    }

    #[test]
    fn test_timer_stop_and_cancel_on_idle_are_noops() {
        let todo_id = id("todo_a1_xxxxxxxxxxxxx");
        let before = model();
        let after = update(before.clone(), Message::TimerStop(todo_id.clone()), now());
        assert_eq!(after, before);
        let after = update(before.clone(), Message::TimerCancel(todo_id), now());
        assert_eq!(after, before);
    }

    #[test]
    fn test_timer_stop_records_and_cancel_discards() {
        let todo_id = id("todo_a1_xxxxxxxxxxxxx");
        let model = update(model(), Message::TimerStart(todo_id.clone()), now());
        let model = update(
            model,
            Message::TimerStop(todo_id.clone()),
            now() + Duration::seconds(30),
        );
        let todo = model.todo(&todo_id).unwrap();
        assert_eq!(todo.total_duration(), Duration::seconds(30));
        assert_eq!(todo.last_worked, Some(now() + Duration::seconds(30)));

        let model = update(
            model,
            Message::TimerStart(todo_id.clone()),
            now() + Duration::minutes(1),
        );
        let model = update(
            model,
            Message::TimerCancel(todo_id.clone()),
            now() + Duration::minutes(2),
        );
        let todo = model.todo(&todo_id).unwrap();
        assert!(!todo.is_running());
        assert_eq!(todo.task_time().len(), 1);
        assert_eq!(todo.total_duration(), Duration::seconds(30));
    }

    #[test]
    fn test_two_phase_delete_confirm() {
        let op = DeleteOp::Project(project_a().id);
        let model = update(model(), Message::RequestDelete(op.clone()), now());
        assert_eq!(model.delete_op, Some(op));
        assert_eq!(model.projects.len(), 2);

        let model = update(model, Message::ConfirmDelete, now());
        assert_eq!(model.delete_op, None);
        assert_eq!(model.projects, vec![project_b()]);
        assert!(model.todos.iter().all(|t| t.project_id == project_b().id));
        assert_eq!(model.selected_project, Some(project_b().id));
    }

    #[test]
    fn test_two_phase_delete_cancel() {
        let before = model();
        let op = DeleteOp::Todo(id("todo_a1_xxxxxxxxxxxxx"));
        let model = update(before.clone(), Message::RequestDelete(op), now());
        let model = update(model, Message::CancelDelete, now());
        assert_eq!(model, before);

        let model = update(model, Message::ConfirmDelete, now());
        assert_eq!(model, before);
    }

    #[test]
    fn test_delete_todo() {
        let todo_id = id("todo_a2_xxxxxxxxxxxxx");
        let model = update(model(), Message::DeleteTodo(todo_id.clone()), now());
        assert!(model.todo(&todo_id).is_none());
        assert_eq!(model.todos.len(), 2);
    }

    #[test]
    fn test_delete_unselected_project_keeps_selection() {
        let model = update(model(), Message::DeleteProject(project_b().id), now());
        assert_eq!(model.selected_project, Some(project_a().id));

        let model = update(model, Message::DeleteProject(project_a().id), now());
        assert_eq!(model.selected_project, None);
        assert!(model.todos.is_empty());
    }

    #[test]
    fn test_sub_millisecond_moments_survive_persistence() {
        let project = project_a();
        let todo = todo("todo_aaaaaaaaaaaaaaaa", &project);
        let started = now() + Duration::nanoseconds(1_234_567);
        let mut model = Model::default();
        for (message, at) in [
            (Message::AddProject(project.clone()), started),
            (Message::AddTodo(todo.clone()), started),
            (
                Message::UpdateProject {
                    id: project.id.clone(),
                    title: None,
                    description: None,
                    due_date: Some(Some(started + Duration::days(3))),
                },
                started,
            ),
            (Message::TimerStart(todo.id.clone()), started),
            (Message::TimerStop(todo.id.clone()), started + Duration::nanoseconds(777)),
            (Message::TimerStart(todo.id.clone()), started + Duration::microseconds(4321)),
        ] {
            model = update(model, message, at);
        }

        let stored = model.todo(&todo.id).unwrap();
        assert_eq!(stored.total_duration(), Duration::zero());
        assert_eq!(stored.last_worked, Some(now() + Duration::milliseconds(1)));
        assert_eq!(
            stored.timer(),
            Timer::Running {
                since: now() + Duration::milliseconds(5)
            }
        );

        let decoded = Model::decode(&model.encode().unwrap()).unwrap();
        assert_eq!(decoded, model);
    }
}
