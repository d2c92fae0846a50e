//! Command-line interface

pub mod app;
pub mod commands;
pub mod ui;

pub use app::{Cli, Commands};

use anyhow::Result;
use log::debug;
use std::sync::Arc;

use crate::api::{RetryConfig, SchedulerClient};
use crate::config::Config;
use commands::{
    checkpoints_command, config_command, enqueue_command, history_command, queue_command,
    samplers_command, task_command,
};

/// Run one parsed command line
pub async fn run(cli: Cli, mut config: Config) -> Result<()> {
    if let Some(url) = cli.server {
        config.set_server(url)?;
    }

    // Config edits never need a server
    if let Commands::Config(args) = cli.command {
        return config_command(args, &config).await;
    }

    // The panel refreshes on its own schedule, so its reads are not retried
    let client = match cli.command {
        Commands::Tui => SchedulerClient::with_retry_policy(&config.server, RetryConfig::none())?,
        _ => SchedulerClient::new(&config.server)?,
    };
    debug!("Using scheduler at {}", client.base_url());

    match cli.command {
        Commands::Queue(args) => queue_command(args, &client).await,
        Commands::History(args) => history_command(args, &client).await,
        Commands::Task(args) => task_command(args, &client).await,
        Commands::Enqueue(args) => enqueue_command(args, &client).await,
        Commands::Samplers => samplers_command(&client).await,
        Commands::Checkpoints => checkpoints_command(&client).await,
        Commands::Tui => crate::tui::launch(Arc::new(client), config.ui).await,
        Commands::Config(_) => Ok(()),
    }
}
