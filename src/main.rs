use anyhow::Result;
use clap::Parser;
use colored::*;
use log::{error, info};

use agent_scheduler::cli::{self, Cli};
use agent_scheduler::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Log to a file (truncated on each run) so the TUI screen stays clean
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("agent-scheduler.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    info!("Starting agent-scheduler");

    let config = Config::load()?;

    if let Err(e) = cli::run(cli, config).await {
        error!("Command failed: {:#}", e);
        eprintln!("{} {}", "✗".bright_red().bold(), format!("{:#}", e).bright_red());
        std::process::exit(1);
    }
    Ok(())
}
