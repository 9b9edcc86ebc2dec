use std::io::Write;

use anyhow::Result;
use clap::Subcommand;

use crate::{
    model::{id::Id, todo::Todo, DeleteOp},
    storage::state_store::StateStore,
    update::{update, Message},
    utils::{clock::Clock, names::random_name, time::format_duration},
};

use super::{
    prompt::Prompt,
    render::render_todos,
    resolve::{resolve_project_or_selected, resolve_todo},
    session::Session,
};

#[derive(Subcommand, Debug)]
pub enum TodoCommand {
    #[command(about = "Add a todo to a project")]
    Add {
        #[arg(long, short, help = "Project id or prefix. Defaults to the selected project")]
        project: Option<String>,
        #[arg(long, short, help = "Title of the todo. A random one is picked by default")]
        title: Option<String>,
    },
    #[command(about = "List todos of a project with their tracked time")]
    List {
        #[arg(long, short, help = "Project id or prefix. Defaults to the selected project")]
        project: Option<String>,
        #[arg(long, short, conflicts_with = "project", help = "List todos of every project")]
        all: bool,
    },
    #[command(about = "Change the title of a todo")]
    Rename {
        #[arg(help = "Todo id or a unique prefix of it")]
        todo: String,
        title: String,
    },
    #[command(about = "Start the timer of a todo. A timer running on another todo is stopped")]
    Start {
        #[arg(help = "Todo id or a unique prefix of it")]
        todo: String,
    },
    #[command(about = "Stop the timer of a todo and record the time")]
    Stop {
        #[arg(help = "Todo id or a unique prefix of it")]
        todo: String,
    },
    #[command(about = "Stop the timer of a todo without recording the time")]
    Cancel {
        #[arg(help = "Todo id or a unique prefix of it")]
        todo: String,
    },
    #[command(about = "Delete a todo")]
    Delete {
        #[arg(help = "Todo id or a unique prefix of it")]
        todo: String,
        #[arg(long, short, help = "Don't ask for confirmation")]
        yes: bool,
    },
}

pub async fn process_todo_command<S: StateStore, C: Clock>(
    session: &Session<S, C>,
    command: TodoCommand,
    out: &mut impl Write,
    prompt: &mut impl Prompt,
) -> Result<()> {
    match command {
        TodoCommand::Add { project, title } => {
            let mut rng = rand::thread_rng();
            let title = title.unwrap_or_else(|| random_name(&mut rng));
            let id = Id::generate(&mut rng);
            let mut project_title = String::new();
            session
                .dispatch(|model| {
                    let project_id = resolve_project_or_selected(model, project.as_deref())?;
                    if let Some(project) = model.project(&project_id) {
                        project_title.clone_from(&project.title);
                    }
                    Ok(vec![Message::AddTodo(Todo::new(id.clone(), project_id, title.clone()))])
                })
                .await?;
            writeln!(out, "Added {title} ({id}) to {project_title}")?;
        }
        TodoCommand::List { project, all } => {
            let model = session.snapshot().await?;
            let now = session.now();
            if all {
                write!(out, "{}", render_todos(&model.todos, now))?;
            } else {
                let project_id = resolve_project_or_selected(&model, project.as_deref())?;
                write!(out, "{}", render_todos(model.project_todos(&project_id), now))?;
            }
        }
        TodoCommand::Rename { todo, title } => {
            let mut renamed = None;
            let model = session
                .dispatch(|model| {
                    let id = resolve_todo(model, &todo)?;
                    renamed = Some(id.clone());
                    Ok(vec![Message::UpdateTodo { id, title }])
                })
                .await?;
            if let Some(todo) = renamed.and_then(|id| model.todo(&id)) {
                writeln!(out, "Renamed {} to {}", todo.id, todo.title)?;
            }
        }
        TodoCommand::Start { todo } => {
            let mut target = None;
            let mut already_running = false;
            let mut others = Vec::new();
            let model = session
                .dispatch(|model| {
                    let id = resolve_todo(model, &todo)?;
                    already_running = model.todo(&id).is_some_and(Todo::is_running);
                    others = model
                        .running_todos()
                        .filter(|t| t.id != id)
                        .map(|t| t.id.clone())
                        .collect::<Vec<_>>();
                    target = Some(id.clone());
                    Ok(vec![Message::TimerStart(id)])
                })
                .await?;
            for stopped in others.iter().filter_map(|id| model.todo(id)) {
                if let Some(interval) = stopped.task_time().last() {
                    writeln!(
                        out,
                        "Stopped {} after {}",
                        stopped.title,
                        format_duration(interval.duration())
                    )?;
                }
            }
            if let Some(started) = target.and_then(|id| model.todo(&id)) {
                if already_running {
                    writeln!(out, "{} is already running", started.title)?;
                } else {
                    writeln!(out, "Started {}", started.title)?;
                }
            }
        }
        TodoCommand::Stop { todo } => {
            let mut target = None;
            let mut was_running = false;
            let model = session
                .dispatch(|model| {
                    let id = resolve_todo(model, &todo)?;
                    was_running = model.todo(&id).is_some_and(Todo::is_running);
                    target = Some(id.clone());
                    Ok(vec![Message::TimerStop(id)])
                })
                .await?;
            if let Some(stopped) = target.and_then(|id| model.todo(&id)) {
                match stopped.task_time().last().filter(|_| was_running) {
                    Some(interval) => writeln!(
                        out,
                        "Stopped {} after {}, {} in total",
                        stopped.title,
                        format_duration(interval.duration()),
                        format_duration(stopped.total_duration())
                    )?,
                    None => writeln!(out, "{} isn't running", stopped.title)?,
                }
            }
        }
        TodoCommand::Cancel { todo } => {
            let mut discarded = None;
            let mut title = String::new();
            session
                .transact(|model, now| {
                    let id = resolve_todo(&model, &todo)?;
                    if let Some(todo) = model.todo(&id) {
                        discarded = todo.elapsed(now);
                        title.clone_from(&todo.title);
                    }
                    Ok(update(model, Message::TimerCancel(id), now))
                })
                .await?;
            match discarded {
                Some(elapsed) => writeln!(out, "Discarded {} on {title}", format_duration(elapsed))?,
                None => writeln!(out, "{title} isn't running")?,
            }
        }
        TodoCommand::Delete { todo, yes } => {
            let mut deleted = None;
            session
                .transact(|model, now| {
                    let id = resolve_todo(&model, &todo)?;
                    let title = model.todo(&id).map(|t| t.title.clone()).unwrap_or_default();
                    let model = update(model, Message::RequestDelete(DeleteOp::Todo(id)), now);
                    let confirmed = yes || prompt.confirm(&format!("Delete todo {title}?"))?;
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
                Some(title) => writeln!(out, "Deleted todo {title}")?,
                None => writeln!(out, "Nothing deleted")?,
            }
        }
    }
    Ok(())
}
