use std::{fmt::Display, io::Write};

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Local, Utc};
use chrono_english::parse_date_string;
use clap::{Subcommand, ValueEnum};

use crate::{
    model::{id::Id, project::Project, DeleteOp},
    storage::state_store::StateStore,
    update::{update, Message},
    utils::{clock::Clock, names::random_name, time::local_day_start},
};

use super::{
    prompt::Prompt,
    render::{local_today, project_line, render_projects},
    resolve::resolve_project,
    session::Session,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    #[command(about = "Create a project and select it")]
    New {
        #[arg(long, short, help = "Title of the project. A random one is picked by default")]
        title: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
    },
    #[command(about = "List all projects. The selected one is marked with *")]
    List {},
    #[command(about = "Select the project todo commands work on by default")]
    Select {
        #[arg(help = "Project id or a unique prefix of it")]
        project: String,
    },
    #[command(about = "Change title, description or due date of a project")]
    Edit {
        #[arg(help = "Project id or a unique prefix of it")]
        project: String,
        #[arg(long, short)]
        title: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(
            long,
            conflicts_with = "clear_due",
            help = "Due date. Examples are \"tomorrow\", \"next friday\", \"15/03/2025\""
        )]
        due: Option<String>,
        #[arg(long, help = "Remove the due date")]
        clear_due: bool,
        #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
        date_style: DateStyle,
    },
    #[command(about = "Delete a project together with its todos")]
    Delete {
        #[arg(help = "Project id or a unique prefix of it")]
        project: String,
        #[arg(long, short, help = "Don't ask for confirmation")]
        yes: bool,
    },
}

/// Parses human input like "next friday" into the start of that local day.
pub fn parse_due_date(input: &str, style: DateStyle, now: DateTime<Local>) -> Result<DateTime<Utc>> {
    let date = parse_date_string(input, now, style.into())
        .map_err(|e| anyhow!("Failed to parse due date \"{input}\": {e}"))?;
    Ok(local_day_start(date))
}

pub async fn process_project_command<S: StateStore, C: Clock>(
    session: &Session<S, C>,
    command: ProjectCommand,
    out: &mut impl Write,
    prompt: &mut impl Prompt,
) -> Result<()> {
    match command {
        ProjectCommand::New { title, description } => {
            let mut rng = rand::thread_rng();
            let title = title.unwrap_or_else(|| random_name(&mut rng));
            let project = Project::new(Id::generate(&mut rng), title)
                .with_description(description.unwrap_or_default());
            session
                .dispatch(|_| Ok(vec![Message::AddProject(project.clone())]))
                .await?;
            writeln!(out, "Created project {} ({})", project.title, project.id)?;
        }
        ProjectCommand::List {} => {
            let model = session.snapshot().await?;
            write!(out, "{}", render_projects(&model, session.now()))?;
        }
        ProjectCommand::Select { project } => {
            let model = session
                .dispatch(|model| Ok(vec![Message::SelectProject(resolve_project(model, &project)?)]))
                .await?;
            if let Some(project) = model.selected_project() {
                writeln!(out, "Selected {} ({})", project.title, project.id)?;
            }
        }
        ProjectCommand::Edit {
            project,
            title,
            description,
            due,
            clear_due,
            date_style,
        } => {
            let due_date = if clear_due {
                Some(None)
            } else {
                due.map(|due| {
                    parse_due_date(&due, date_style, session.now().with_timezone(&Local))
                })
                    .transpose()?
                    .map(Some)
            };
            if title.is_none() && description.is_none() && due_date.is_none() {
                bail!("Nothing to change, pass --title, --description, --due or --clear-due");
            }
            let mut edited = None;
            let model = session
                .dispatch(|model| {
                    let id = resolve_project(model, &project)?;
                    edited = Some(id.clone());
                    Ok(vec![Message::UpdateProject {
                        id,
                        title,
                        description,
                        due_date,
                    }])
                })
                .await?;
            if let Some(project) = edited.and_then(|id| model.project(&id)) {
                let selected = model.selected_project.as_ref() == Some(&project.id);
                writeln!(out, "{}", project_line(project, selected, local_today(session.now())))?;
            }
        }
        ProjectCommand::Delete { project, yes } => {
            let mut deleted = None;
            session
                .transact(|model, now| {
                    let id = resolve_project(&model, &project)?;
                    let title = model
                        .project(&id)
                        .map(|p| p.title.clone())
                        .unwrap_or_default();
                    let todo_count = model.project_todos(&id).count();
                    let model = update(model, Message::RequestDelete(DeleteOp::Project(id)), now);
                    let confirmed = yes
                        || prompt.confirm(&format!(
                            "Delete project {title} and its {todo_count} todos?"
                        ))?;
                    let message = if confirmed {
                        deleted = Some(title);
                        Message::ConfirmDelete
                    } else {
                        Message::CancelDelete
                    };
                    Ok(update(model, message, now))
                })
                .await?;
            match deleted {
                Some(title) => writeln!(out, "Deleted project {title}")?,
                None => writeln!(out, "Nothing deleted")?,
            }
        }
    }
    Ok(())
}
