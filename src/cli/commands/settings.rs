use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use dialoguer::Input;

use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show the effective configuration
    Show,
    /// Point the client at a scheduler server
    SetServer {
        /// Base url of the web UI, e.g. http://127.0.0.1:7860
        url: String,
    },
    /// Store basic auth credentials, prompting for the password
    SetAuth {
        /// Username, prompted for when omitted
        #[arg(long)]
        username: Option<String>,
    },
    /// Remove stored credentials
    ClearAuth,
}

/// `effective` carries env and flag overrides; edits apply to the file alone
pub async fn config_command(args: ConfigCommands, effective: &Config) -> Result<()> {
    match args.command {
        ConfigSubcommands::Show => {
            show(effective);
            Ok(())
        }
        ConfigSubcommands::SetServer { url } => {
            let mut config = Config::load_from(&Config::get_config_path()?)?;
            config.set_server(url.clone())?;
            config.save()?;
            println!("{} Server set to {}", "✓".bright_green().bold(), url.bright_yellow());
            Ok(())
        }
        ConfigSubcommands::SetAuth { username } => {
            let username = match username {
                Some(username) => username,
                None => Input::<String>::new().with_prompt("Username").interact_text()?,
            };
            let password = rpassword::prompt_password("Password: ")?;

            let mut config = Config::load_from(&Config::get_config_path()?)?;
            config.set_auth(username.clone(), password);
            config.save()?;
            println!(
                "{} Credentials saved for {}",
                "✓".bright_green().bold(),
                username.bright_yellow()
            );
            Ok(())
        }
        ConfigSubcommands::ClearAuth => {
            let mut config = Config::load_from(&Config::get_config_path()?)?;
            config.clear_auth();
            config.save()?;
            println!("{} Credentials removed", "✓".bright_green().bold());
            Ok(())
        }
    }
}

fn show(config: &Config) {
    let row = |label: &str, value: String| println!("  {:<22} {}", label.dimmed(), value);
    let path = Config::get_config_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|_| "unavailable".to_string());

    println!();
    println!("  {} {}", "Config file".bright_white().bold(), path.dimmed());
    println!();
    println!("  {}", "[server]".bright_cyan());
    row("url", config.server.url.clone());
    row("api_prefix", config.server.api_prefix.clone());
    row(
        "username",
        config.server.username.clone().unwrap_or_else(|| "-".to_string()),
    );
    row(
        "password",
        if config.server.password.is_some() { "********" } else { "-" }.to_string(),
    );
    row("timeout_secs", config.server.timeout_secs.to_string());
    println!();
    println!("  {}", "[ui]".bright_cyan());
    let page_size = match config.ui.page_size {
        0 => "auto".to_string(),
        size => size.to_string(),
    };
    row("page_size", page_size);
    row("refresh_interval_secs", config.ui.refresh_interval_secs.to_string());
    row("drag_page_delay_ms", config.ui.drag_page_delay_ms.to_string());
    row("row_height", config.ui.row_height.to_string());
    row("toast_duration_ms", config.ui.toast_duration_ms.to_string());
    println!();
}
