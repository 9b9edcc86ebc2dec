//! Persisted entities and their conversion into the model.
//!
//! Wire shapes (camelCase keys, dates as ISO strings, durations as milliseconds):
//!  - TaskTime: `{start, end, duration}`, `duration` is ignored on read and recomputed.
//!  - Todo: `{id, projectId, title, taskTime, totalDuration, lastWorked?, taskStartTime?}`.
//!  - Project: `{id, title, description, dueDate?}`, `dueDate` is written as `null` when absent.
//!  - Model: `{projects, todos, selectedProject?}`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{
    id::Id,
    project::Project,
    todo::{checked_total, TaskTime, Timer, Todo},
    Model,
};

use super::{from_entities, iso_date, maybe, millis, Codec, DecodeError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTimeEntity {
    #[serde(with = "iso_date")]
    pub start: DateTime<Utc>,
    #[serde(with = "iso_date")]
    pub end: DateTime<Utc>,
    #[serde(
        serialize_with = "millis::serialize",
        skip_deserializing,
        default = "Duration::zero"
    )]
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoEntity {
    pub id: Id,
    pub project_id: Id,
    pub title: String,
    pub task_time: Vec<TaskTimeEntity>,
    #[serde(with = "millis")]
    pub total_duration: Duration,
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub last_worked: Option<DateTime<Utc>>,
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub task_start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntity {
    pub id: Id,
    pub title: String,
    pub description: String,
    #[serde(default, with = "iso_date::option")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Only the persisted part of the model travels, the pending delete never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedModelEntity {
    pub projects: Vec<ProjectEntity>,
    pub todos: Vec<TodoEntity>,
    // The selection is a convenience, a broken one is dropped instead of failing the load.
    #[serde(default, deserialize_with = "maybe::deserialize")]
    pub selected_project: Option<ProjectEntity>,
}

impl Codec for TaskTime {
    type Entity = TaskTimeEntity;

    fn from_entity(entity: TaskTimeEntity) -> Result<Self, DecodeError> {
        TaskTime::new(entity.start, entity.end).ok_or_else(|| {
            DecodeError::new(format!(
                "end {} is before start {}",
                entity.end, entity.start
            ))
            .at_key("end")
        })
    }

    fn to_entity(&self) -> TaskTimeEntity {
        TaskTimeEntity {
            start: self.start(),
            end: self.end(),
            duration: self.duration(),
        }
    }
}

impl Codec for Todo {
    type Entity = TodoEntity;

    fn from_entity(entity: TodoEntity) -> Result<Self, DecodeError> {
        let task_time = from_entities::<TaskTime>(entity.task_time, "taskTime")?;
        let total = checked_total(&task_time).ok_or_else(|| {
            DecodeError::new("intervals add up to more than the longest duration")
                .at_key("taskTime")
        })?;
        if total != entity.total_duration {
            warn!(
                "Todo {} stored totalDuration {}ms, but its intervals sum up to {}ms",
                entity.id,
                entity.total_duration.num_milliseconds(),
                total.num_milliseconds()
            );
        }
        let timer = match entity.task_start_time {
            Some(since) => Timer::Running { since },
            None => Timer::Idle,
        };
        Ok(Todo::from_parts(
            entity.id,
            entity.project_id,
            entity.title,
            task_time,
            entity.last_worked,
            timer,
        ))
    }

    fn to_entity(&self) -> TodoEntity {
        TodoEntity {
            id: self.id.clone(),
            project_id: self.project_id.clone(),
            title: self.title.clone(),
            task_time: self.task_time().iter().map(Codec::to_entity).collect(),
            total_duration: self.total_duration(),
            last_worked: self.last_worked,
            task_start_time: self.task_start_time(),
        }
    }
}

impl Codec for Project {
    type Entity = ProjectEntity;

    fn from_entity(entity: ProjectEntity) -> Result<Self, DecodeError> {
        Ok(Project::new(entity.id, entity.title)
            .with_description(entity.description)
            .with_due_date(entity.due_date))
    }

    fn to_entity(&self) -> ProjectEntity {
        ProjectEntity {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
        }
    }
}

impl Codec for Model {
    type Entity = PersistedModelEntity;

    fn from_entity(entity: PersistedModelEntity) -> Result<Self, DecodeError> {
        let projects = from_entities::<Project>(entity.projects, "projects")?;
        let todos = from_entities::<Todo>(entity.todos, "todos")?;
        let selected_project = entity
            .selected_project
            .map(|project| project.id)
            .filter(|id| {
                let known = projects.iter().any(|project| project.id == *id);
                if !known {
                    warn!("Selected project {id} doesn't exist, dropping selection");
                }
                known
            });

        Ok(Model {
            projects,
            todos,
            selected_project,
            delete_op: None,
        })
    }

    fn to_entity(&self) -> PersistedModelEntity {
        PersistedModelEntity {
            projects: self.projects.iter().map(Codec::to_entity).collect(),
            todos: self.todos.iter().map(Codec::to_entity).collect(),
            selected_project: self.selected_project().map(Codec::to_entity),
        }
    }
}
