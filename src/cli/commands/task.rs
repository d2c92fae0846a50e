use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use std::fs;
use std::path::PathBuf;

use super::params::GenerationArgs;
use crate::api::{SchedulerClient, Task, UpdateTaskArgs};
use crate::cli::ui::{report, status_label, with_spinner};

#[derive(Args)]
pub struct TaskCommands {
    #[command(subcommand)]
    pub command: TaskSubcommands,
}

#[derive(Subcommand)]
pub enum TaskSubcommands {
    /// Show a task with its generation parameters
    Show {
        /// Task id
        id: String,
    },
    /// Show where a task sits in the queue
    Position {
        /// Task id
        id: String,
    },
    /// Change a task's name, checkpoint or generation parameters
    Update {
        /// Task id
        id: String,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// Checkpoint to generate with
        #[arg(long)]
        checkpoint: Option<String>,
        #[command(flatten)]
        params: GenerationArgs,
    },
    /// Download a finished task's images as a zip archive
    Results {
        /// Task id
        id: String,
        /// Destination zip file
        #[arg(short, long)]
        output: PathBuf,
    },
}

pub async fn task_command(args: TaskCommands, client: &SchedulerClient) -> Result<()> {
    match args.command {
        TaskSubcommands::Show { id } => {
            let task = with_spinner("Loading task", client.get_task(&id)).await?;
            print_details(&task)
        }
        TaskSubcommands::Position { id } => {
            let position = client.task_position(&id).await?;
            match position.position {
                Some(slot) => println!(
                    "Task {} is {} at position {}",
                    id.bright_yellow(),
                    status_label(position.status).to_string().trim_end(),
                    (slot + 1).to_string().bright_white().bold()
                ),
                None => println!(
                    "Task {} is {}",
                    id.bright_yellow(),
                    status_label(position.status).to_string().trim_end()
                ),
            }
            Ok(())
        }
        TaskSubcommands::Update {
            id,
            name,
            checkpoint,
            params,
        } => {
            let params = params.to_params();
            let update = UpdateTaskArgs {
                name,
                checkpoint,
                params: (!params.is_empty()).then_some(params),
            };
            if update.is_empty() {
                anyhow::bail!("Nothing to update, pass at least one of --name, --checkpoint or a generation flag");
            }
            report(&client.update_task(&id, &update).await?)
        }
        TaskSubcommands::Results { id, output } => {
            let archive = with_spinner("Downloading results", client.download_results(&id)).await?;
            fs::write(&output, &archive)
                .with_context(|| format!("Failed to write results archive: {:?}", output))?;
            println!(
                "{} Saved {} bytes to {}",
                "✓".bright_green().bold(),
                archive.len(),
                output.display().to_string().bright_yellow()
            );
            Ok(())
        }
    }
}

fn print_details(task: &Task) -> Result<()> {
    let field = |label: &str, value: String| println!("  {:<12} {}", label.dimmed(), value);

    println!();
    println!("  {}", task.display_name().bright_white().bold());
    field("id", task.id.clone());
    field("status", status_label(task.status).to_string());
    field("type", task.task_type.clone());
    if let Some(priority) = task.priority {
        field("priority", priority.to_string());
    }
    if let Some(checkpoint) = task.checkpoint() {
        field("checkpoint", checkpoint.to_string());
    }
    if task.is_bookmarked() {
        field("bookmarked", "yes".bright_yellow().to_string());
    }
    if let Some(created) = task.created_at {
        field("created", created.to_rfc3339());
    }
    if let Some(updated) = task.updated_at {
        field("updated", updated.to_rfc3339());
    }
    if let Some(result) = &task.result {
        field("result", result.clone());
    }

    println!();
    println!("  {}", "Parameters".bright_white().bold());
    let params = serde_json::to_string_pretty(&task.params).context("Failed to format parameters")?;
    for line in params.lines() {
        println!("  {}", line);
    }
    println!();
    Ok(())
}
