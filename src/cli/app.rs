use super::commands::{ConfigCommands, EnqueueCommands, HistoryCommands, QueueCommands, TaskCommands};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "agent-scheduler")]
#[command(version)]
#[command(about = "Manage the Stable Diffusion agent scheduler queue from the terminal")]
pub struct Cli {
    /// Server url for this run, overriding config and environment
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pending queue management
    Queue(QueueCommands),
    /// Finished task history
    History(HistoryCommands),
    /// Inspect and edit single tasks
    Task(TaskCommands),
    /// Add a generation task to the queue
    Enqueue(EnqueueCommands),
    /// List available samplers
    Samplers,
    /// List available checkpoints
    Checkpoints,
    /// Launch the interactive queue panel
    Tui,
    /// Client configuration
    Config(ConfigCommands),
}
