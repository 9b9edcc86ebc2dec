use anyhow::{bail, Result};

use crate::model::{id::Id, Model};

/// Finds the id matching `input` exactly or as a unique prefix.
fn resolve<'a>(kind: &str, ids: impl Iterator<Item = &'a Id>, input: &str) -> Result<Id> {
    let input = input.trim();
    if input.is_empty() {
        bail!("Empty {kind} id");
    }
    let matching = ids
        .filter(|id| id.as_str().starts_with(input))
        .collect::<Vec<_>>();
    if let Some(exact) = matching.iter().find(|id| id.as_str() == input) {
        return Ok((*exact).clone());
    }
    match matching.as_slice() {
        [] => bail!("No {kind} matches \"{input}\""),
        [id] => Ok((*id).clone()),
        many => bail!(
            "\"{input}\" is ambiguous, it matches {} {kind}s: {}",
            many.len(),
            many.iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

pub fn resolve_project(model: &Model, input: &str) -> Result<Id> {
    resolve("project", model.projects.iter().map(|p| &p.id), input)
}

pub fn resolve_todo(model: &Model, input: &str) -> Result<Id> {
    resolve("todo", model.todos.iter().map(|t| &t.id), input)
}

/// The given project, or the selected one when none was given.
pub fn resolve_project_or_selected(model: &Model, input: Option<&str>) -> Result<Id> {
    match input {
        Some(input) => resolve_project(model, input),
        None => match &model.selected_project {
            Some(id) => Ok(id.clone()),
            None => bail!("No project selected, pass one with --project"),
        },
    }
}
