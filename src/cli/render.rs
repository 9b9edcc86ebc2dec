use std::fmt::Write;

use ansi_term::Colour;
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

use crate::{
    model::{
        project::{Project, Urgency},
        todo::Todo,
        Model,
    },
    utils::time::format_duration,
};

pub fn local_today(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Local).date_naive()
}

fn days_left_text(days_left: i64) -> String {
    match days_left {
        days if days <= -2 => format!("overdue by {} days", -days),
        -1 => "overdue by 1 day".into(),
        0 => "due today".into(),
        1 => "due tomorrow".into(),
        days => format!("{days} days left"),
    }
}

/// Due date with the remaining days, coloured by urgency.
pub fn render_due(project: &Project, today: NaiveDate) -> Option<String> {
    let due = project.due_date?.with_timezone(&Local);
    let days_left = project.days_left(today)?;
    let text = format!("{} ({})", due.format("%b %-d"), days_left_text(days_left));
    Some(match Urgency::from_days_left(days_left) {
        Urgency::Warn => Colour::Red.paint(text).to_string(),
        Urgency::Soon => Colour::Yellow.paint(text).to_string(),
        Urgency::Relaxed => text,
    })
}

pub fn project_line(project: &Project, selected: bool, today: NaiveDate) -> String {
    let marker = if selected { "*" } else { " " };
    let mut line = format!("{marker} {}  {}", project.id, project.title);
    if let Some(due) = render_due(project, today) {
        let _ = write!(line, "  {due}");
    }
    line
}

pub fn todo_line(todo: &Todo, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "{}  {}  {}",
        todo.id,
        todo.title,
        format_duration(todo.total_duration())
    );
    if let Some(elapsed) = todo.elapsed(now) {
        let _ = write!(
            line,
            "  {}",
            Colour::Green.paint(format!("running {}", format_duration(elapsed)))
        );
    }
    line
}

pub fn render_projects(model: &Model, now: DateTime<Utc>) -> String {
    if model.projects.is_empty() {
        return "No projects yet. Create one with `tasktally project new`.\n".into();
    }
    let today = local_today(now);
    let mut out = String::new();
    for project in &model.projects {
        let selected = model.selected_project.as_ref() == Some(&project.id);
        let _ = writeln!(out, "{}", project_line(project, selected, today));
    }
    out
}

pub fn render_todos<'a>(todos: impl IntoIterator<Item = &'a Todo>, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for todo in todos {
        let _ = writeln!(out, "{}", todo_line(todo, now));
    }
    if out.is_empty() {
        out.push_str("No todos.\n");
    }
    out
}

pub fn render_status(model: &Model, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    match model.selected_project() {
        None => {
            out.push_str("No project selected.\n");
        }
        Some(project) => {
            let _ = write!(out, "Project: {} ({})", project.title, project.id);
            if let Some(due) = render_due(project, local_today(now)) {
                let _ = write!(out, "  {due}");
            }
            out.push('\n');
            if !project.description.is_empty() {
                let _ = writeln!(out, "  {}", project.description);
            }
            let todos = model.project_todos(&project.id).collect::<Vec<_>>();
            let total = todos
                .iter()
                .fold(Duration::zero(), |total, todo| total + todo.total_duration());
            out.push_str(&render_todos(todos, now));
            let _ = writeln!(out, "Total: {}", format_duration(total));
        }
    }
    for todo in model.running_todos() {
        let project = model
            .project(&todo.project_id)
            .map_or("unknown project", |p| p.title.as_str());
        let _ = writeln!(
            out,
            "Running: {} in {} for {}",
            todo.title,
            project,
            format_duration(todo.elapsed(now).unwrap_or_else(Duration::zero))
        );
    }
    out
}
