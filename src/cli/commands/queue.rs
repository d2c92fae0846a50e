use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use log::info;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use crate::api::SchedulerClient;
use crate::cli::ui::{confirm, print_task, report, with_spinner};
use crate::reorder::MoveTarget;

#[derive(Args)]
pub struct QueueCommands {
    #[command(subcommand)]
    pub command: QueueSubcommands,
}

#[derive(Subcommand)]
pub enum QueueSubcommands {
    /// List pending tasks in queue order
    List {
        /// Maximum number of tasks to show
        #[arg(long, default_value_t = 50)]
        limit: usize,
        /// Number of tasks to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Stop picking up new tasks
    Pause,
    /// Continue processing the queue
    Resume,
    /// Remove every pending task
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Run a pending task right away
    Run {
        /// Task id
        id: String,
    },
    /// Delete a task, interrupting it if it is running
    Delete {
        /// Task id
        id: String,
    },
    /// Move a pending task to a new slot
    Move {
        /// Task id
        id: String,
        #[command(flatten)]
        target: MoveTargetArgs,
    },
    /// Export the pending queue as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import tasks from a JSON export
    Import {
        /// File produced by `queue export`
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct MoveTargetArgs {
    /// Place the task just before this task
    #[arg(long, value_name = "ID")]
    pub before: Option<String>,
    /// Move to the head of the queue
    #[arg(long)]
    pub top: bool,
    /// Move to the end of the queue
    #[arg(long)]
    pub bottom: bool,
}

impl MoveTargetArgs {
    pub fn into_target(self) -> MoveTarget {
        match (self.before, self.top) {
            (Some(id), _) => MoveTarget::Before(id),
            (None, true) => MoveTarget::Top,
            (None, false) => MoveTarget::Bottom,
        }
    }
}

pub async fn queue_command(args: QueueCommands, client: &SchedulerClient) -> Result<()> {
    match args.command {
        QueueSubcommands::List { limit, offset } => list_queue(client, limit, offset).await,
        QueueSubcommands::Pause => report(&client.pause_queue().await?),
        QueueSubcommands::Resume => report(&client.resume_queue().await?),
        QueueSubcommands::Clear { yes } => {
            if !confirm("Clear all pending tasks?", yes)? {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            report(&client.clear_queue().await?)
        }
        QueueSubcommands::Run { id } => report(&client.run_task(&id).await?),
        QueueSubcommands::Delete { id } => report(&client.delete_task(&id).await?),
        QueueSubcommands::Move { id, target } => {
            let target = target.into_target();
            info!("Moving task {} to {}", id, target.describe());
            report(&client.move_task_to(&id, &target).await?)
        }
        QueueSubcommands::Export { output } => export_queue(client, output).await,
        QueueSubcommands::Import { file } => import_queue(client, file).await,
    }
}

async fn list_queue(client: &SchedulerClient, limit: usize, offset: usize) -> Result<()> {
    let status = with_spinner("Loading queue", client.queue_status(limit, offset)).await?;

    let state = if status.paused {
        "paused".bright_yellow().bold()
    } else {
        "running".bright_green().bold()
    };
    println!();
    println!(
        "  {} {} · {} pending",
        "Queue".bright_white().bold(),
        state,
        status.total_pending_tasks
    );
    println!();

    if status.pending_tasks.is_empty() {
        println!("  {}", "No pending tasks".dimmed());
        return Ok(());
    }

    for (index, task) in status.pending_tasks.iter().enumerate() {
        let is_current = status.current_task_id.as_deref() == Some(task.id.as_str());
        print_task(offset + index + 1, task, is_current);
    }

    let shown = offset + status.pending_tasks.len();
    if shown < status.total_pending_tasks {
        println!();
        println!(
            "  {}",
            format!(
                "{} more, use --offset {} to continue",
                status.total_pending_tasks - shown,
                shown
            )
            .dimmed()
        );
    }
    Ok(())
}

async fn export_queue(client: &SchedulerClient, output: Option<PathBuf>) -> Result<()> {
    let tasks = with_spinner("Exporting queue", client.export_queue()).await?;
    let content = serde_json::to_string_pretty(&tasks).context("Failed to serialize export")?;

    match output {
        Some(path) => {
            fs::write(&path, content)
                .with_context(|| format!("Failed to write export file: {:?}", path))?;
            let count = tasks.as_array().map_or(0, Vec::len);
            println!(
                "{} Exported {} tasks to {}",
                "✓".bright_green().bold(),
                count,
                path.display().to_string().bright_yellow()
            );
        }
        None => println!("{}", content),
    }
    Ok(())
}

async fn import_queue(client: &SchedulerClient, file: PathBuf) -> Result<()> {
    let content = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read import file: {:?}", file))?;

    // Catch obviously broken files before the server does
    let parsed: Value = serde_json::from_str(&content)
        .with_context(|| format!("Import file is not valid JSON: {:?}", file))?;
    if !parsed.is_array() {
        anyhow::bail!("Import file must contain a JSON array of tasks: {:?}", file);
    }

    report(&client.import_queue(content).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::cli::app::Commands;
    use clap::Parser;

    fn move_target(args: &[&str]) -> Result<MoveTarget, clap::Error> {
        let cli = Cli::try_parse_from(
            ["agent-scheduler", "queue", "move", "t1"]
                .into_iter()
                .chain(args.iter().copied()),
        )?;
        match cli.command {
            Commands::Queue(QueueCommands {
                command: QueueSubcommands::Move { target, .. },
            }) => Ok(target.into_target()),
            _ => panic!("expected queue move"),
        }
    }

    #[test]
    fn move_requires_exactly_one_target() {
        assert_eq!(move_target(&["--before", "t9"]).unwrap(), MoveTarget::Before("t9".into()));
        assert_eq!(move_target(&["--top"]).unwrap(), MoveTarget::Top);
        assert_eq!(move_target(&["--bottom"]).unwrap(), MoveTarget::Bottom);
        assert!(move_target(&[]).is_err());
        assert!(move_target(&["--top", "--bottom"]).is_err());
    }
}
