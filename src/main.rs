//! corkboard - a Kanban board client for a REST task service.
//!
//! Shows a project's board and applies column and task changes from the
//! command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use corkboard_api::{HttpTaskService, MemoryTaskService, TaskService};
use corkboard_board::{Board, ColumnRegistry, ColumnStore, FileColumnStore, MemoryColumnStore, SyncEvent};
use corkboard_config::Config;
use corkboard_protocol::dummy::demo_tasks;
use corkboard_protocol::{ProjectId, TaskId};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "CORKBOARD_LOG";

#[derive(Parser)]
#[command(name = "corkboard")]
#[command(version, about = "Kanban board client with per-project column layouts")]
struct Cli {
    /// Project whose board to open
    #[arg(short, long, default_value = "1", global = true)]
    project: ProjectId,

    /// Configuration file to use instead of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use built-in demo tasks and an in-memory layout instead of the service
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the board
    Show,
    /// Append a column
    AddColumn { name: String },
    /// Remove an empty column
    RemoveColumn { name: String },
    /// Move a column to the position of another
    ReorderColumn { moved: String, target: String },
    /// Forget the project's layout and go back to the default columns
    ResetColumns,
    /// Move a task to another column
    Move { task_id: TaskId, column: String },
    /// Create a task
    Create {
        title: String,
        /// Column for the new task (defaults to the first one)
        #[arg(long)]
        column: Option<String>,
    },
    /// Delete a task
    Delete { task_id: TaskId },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Config::load().context("failed to load configuration"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let command = cli.command.unwrap_or(Command::Show);

    if cli.demo {
        let service: Arc<dyn TaskService> =
            Arc::new(MemoryTaskService::with_tasks(demo_tasks(cli.project)));
        let registry = ColumnRegistry::from_config(MemoryColumnStore::new(), &config.columns);
        return run(Board::new(cli.project, registry, service), command).await;
    }

    let store_dir = config.columns.resolved_store_dir()?;
    let store = FileColumnStore::with_path(&store_dir)
        .with_context(|| format!("failed to open column store at {}", store_dir.display()))?;
    let service: Arc<dyn TaskService> = Arc::new(HttpTaskService::new(&config.api)?);
    debug!(base_url = %config.api.base_url, "using task service");

    let registry = ColumnRegistry::from_config(store, &config.columns);
    run(Board::new(cli.project, registry, service), command).await
}

async fn run<S: ColumnStore>(mut board: Board<S>, command: Command) -> Result<()> {
    if let Err(err) = board.load().await {
        if matches!(command, Command::Show) {
            print!("{}", board.view()?);
        }
        return Err(err.into());
    }

    match command {
        Command::Show => {}
        Command::AddColumn { name } => {
            board.add_column(&name)?;
        }
        Command::RemoveColumn { name } => {
            board.delete_column(&name)?;
        }
        Command::ReorderColumn { moved, target } => {
            if !board.reorder_column(&moved, &target)? {
                bail!("cannot move column \"{moved}\" to \"{target}\"");
            }
        }
        Command::ResetColumns => {
            board.registry().reset(board.project_id())?;
        }
        Command::Move { task_id, column } => {
            board.move_task(task_id, &column)?;
        }
        Command::Create { title, column } => {
            let mut task = board.new_task_context()?.draft(title);
            if column.is_some() {
                task.status = column;
            }
            let created = board.create_task(task).await?;
            println!("Created task #{}", created.id);
        }
        Command::Delete { task_id } => {
            board.delete_task(task_id)?;
        }
    }

    let failures: Vec<SyncEvent> = board
        .settle()
        .await
        .into_iter()
        .filter(|event| event.error().is_some())
        .collect();

    print!("{}", board.view()?);

    if let Some(event) = failures.first() {
        let reason = event
            .error()
            .map(ToString::to_string)
            .unwrap_or_default();
        bail!("change to task #{} was rolled back: {reason}", event.task_id());
    }
    Ok(())
}
