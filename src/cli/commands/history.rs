use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;

use crate::api::{HistoryFilter, SchedulerClient};
use crate::cli::ui::{confirm, print_task, report, with_spinner};

#[derive(Args)]
pub struct HistoryCommands {
    #[command(subcommand)]
    pub command: HistorySubcommands,
}

#[derive(Subcommand)]
pub enum HistorySubcommands {
    /// List finished tasks, bookmarks first
    List {
        /// Only show tasks with this outcome
        #[arg(long, value_enum, default_value_t = HistoryFilter::All)]
        status: HistoryFilter,
        /// Maximum number of tasks to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Number of tasks to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Put a finished task back into the queue
    Requeue {
        /// Task id
        id: String,
    },
    /// Requeue every failed task
    RequeueFailed,
    /// Keep a task at the top of the history
    Bookmark {
        /// Task id
        id: String,
    },
    /// Remove a bookmark
    Unbookmark {
        /// Task id
        id: String,
    },
    /// Give a task a display name
    Rename {
        /// Task id
        id: String,
        /// New name
        name: String,
    },
    /// Delete every finished, failed and interrupted task
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn history_command(args: HistoryCommands, client: &SchedulerClient) -> Result<()> {
    match args.command {
        HistorySubcommands::List {
            status,
            limit,
            offset,
        } => list_history(client, status, limit, offset).await,
        HistorySubcommands::Requeue { id } => report(&client.requeue_task(&id).await?),
        HistorySubcommands::RequeueFailed => report(&client.requeue_failed().await?),
        HistorySubcommands::Bookmark { id } => report(&client.set_bookmark(&id, true).await?),
        HistorySubcommands::Unbookmark { id } => report(&client.set_bookmark(&id, false).await?),
        HistorySubcommands::Rename { id, name } => {
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("Task name cannot be empty");
            }
            report(&client.rename_task(&id, name).await?)
        }
        HistorySubcommands::Clear { yes } => {
            if !confirm("Clear the task history?", yes)? {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            report(&client.clear_history().await?)
        }
    }
}

async fn list_history(
    client: &SchedulerClient,
    status: HistoryFilter,
    limit: usize,
    offset: usize,
) -> Result<()> {
    let history = with_spinner("Loading history", client.history(status, limit, offset)).await?;

    println!();
    println!(
        "  {} [{}] · {} tasks",
        "History".bright_white().bold(),
        status.as_str().bright_cyan(),
        history.total
    );
    println!();

    if history.tasks.is_empty() {
        println!("  {}", "No tasks in history".dimmed());
        return Ok(());
    }

    for (index, task) in history.tasks.iter().enumerate() {
        print_task(offset + index + 1, task, false);
    }
    Ok(())
}
