//! Read-only listings of what the web UI has installed

use anyhow::Result;
use colored::*;

use crate::api::SchedulerClient;
use crate::cli::ui::with_spinner;

pub async fn samplers_command(client: &SchedulerClient) -> Result<()> {
    let samplers = with_spinner("Loading samplers", client.samplers()).await?;
    print_names("Samplers", &samplers);
    Ok(())
}

pub async fn checkpoints_command(client: &SchedulerClient) -> Result<()> {
    let checkpoints = with_spinner("Loading checkpoints", client.checkpoints()).await?;
    print_names("Checkpoints", &checkpoints);
    Ok(())
}

fn print_names(title: &str, names: &[String]) {
    println!();
    println!("  {} ({})", title.bright_white().bold(), names.len());
    for name in names {
        println!("  {} {}", "•".bright_green(), name);
    }
    println!();
}
