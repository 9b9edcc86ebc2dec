//! In-memory state of the tracker. Everything here is plain data, changes go through
//! [crate::update::update].

pub mod id;
pub mod project;
pub mod todo;

use id::Id;
use project::Project;
use todo::Todo;

/// Pending half of a two-phase delete. Kept in memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOp {
    Project(Id),
    Todo(Id),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    pub projects: Vec<Project>,
    pub todos: Vec<Todo>,
    pub selected_project: Option<Id>,
    pub delete_op: Option<DeleteOp>,
}

impl Model {
    pub fn project(&self, id: &Id) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == *id)
    }

    pub fn todo(&self, id: &Id) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == *id)
    }

    pub fn project_todos<'a>(&'a self, project_id: &'a Id) -> impl Iterator<Item = &'a Todo> {
        self.todos
            .iter()
            .filter(move |todo| todo.project_id == *project_id)
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected_project.as_ref().and_then(|id| self.project(id))
    }

    pub fn running_todos(&self) -> impl Iterator<Item = &Todo> {
        self.todos.iter().filter(|todo| todo.is_running())
    }
}
