pub mod project;
pub mod prompt;
pub mod render;
pub mod resolve;
pub mod session;
pub mod todo;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use project::{process_project_command, ProjectCommand};
use prompt::{Prompt, StdinPrompt};
use render::render_status;
use session::Session;
use todo::{process_todo_command, TodoCommand};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    codec::Codec,
    storage::state_store::{LocalStateStore, StateStore},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, create_application_path},
        logging::enable_logging,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Tasktally", version, long_about = None)]
#[command(about = "Track projects, todos and the time spent working on them", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Show the selected project, its todos and running timers")]
    Status {},
    #[command(about = "Manage projects")]
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    #[command(about = "Manage todos and their timers")]
    Todo {
        #[command(subcommand)]
        command: TodoCommand,
    },
    #[command(about = "Print the stored state as JSON")]
    Export {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = match args.dir {
        Some(dir) => create_application_path(dir)?,
        None => create_application_default_path()?,
    };

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&app_dir.join("logs"), logging_level, args.log)?;
    debug!("Using application directory {app_dir:?}");

    let session = Session::new(LocalStateStore::new(app_dir)?, DefaultClock);
    let mut stdout = io::stdout();
    run_command(&session, args.commands, &mut stdout, &mut StdinPrompt).await
}

async fn run_command<S: StateStore, C: Clock>(
    session: &Session<S, C>,
    command: Commands,
    out: &mut impl Write,
    prompt: &mut impl Prompt,
) -> Result<()> {
    match command {
        Commands::Status {} => {
            let model = session.snapshot().await?;
            write!(out, "{}", render_status(&model, session.now()))?;
        }
        Commands::Project { command } => {
            process_project_command(session, command, out, prompt).await?
        }
        Commands::Todo { command } => process_todo_command(session, command, out, prompt).await?,
        Commands::Export {} => {
            let model = session.snapshot().await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&model.to_entity())?)?;
        }
    }
    Ok(())
}
