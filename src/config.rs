use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::constants::{DEFAULT_API_PREFIX, DEFAULT_SERVER_URL};
use crate::reorder::DragConfig;

pub const ENV_URL: &str = "AGENT_SCHEDULER_URL";
pub const ENV_USERNAME: &str = "AGENT_SCHEDULER_USERNAME";
pub const ENV_PASSWORD: &str = "AGENT_SCHEDULER_PASSWORD";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_api_prefix() -> String {
    DEFAULT_API_PREFIX.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_prefix: default_api_prefix(),
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    /// Rows per page; 0 fits the page to the terminal height
    #[serde(default)]
    pub page_size: usize,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_drag_page_delay_ms")]
    pub drag_page_delay_ms: u64,
    /// Nominal task row height in terminal lines
    #[serde(default = "default_row_height")]
    pub row_height: u16,
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
}

fn default_refresh_interval_secs() -> u64 {
    5
}

fn default_drag_page_delay_ms() -> u64 {
    1500
}

fn default_row_height() -> u16 {
    2
}

fn default_toast_duration_ms() -> u64 {
    3000
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: 0,
            refresh_interval_secs: default_refresh_interval_secs(),
            drag_page_delay_ms: default_drag_page_delay_ms(),
            row_height: default_row_height(),
            toast_duration_ms: default_toast_duration_ms(),
        }
    }
}

impl UiConfig {
    /// Rows shorter than two lines cannot be split into halves
    pub fn effective_row_height(&self) -> u16 {
        self.row_height.clamp(2, 3)
    }

    pub fn drag_config(&self) -> DragConfig {
        DragConfig {
            page_advance_delay: Duration::from_millis(self.drag_page_delay_ms),
            default_row_height: f64::from(self.effective_row_height()),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("agent-scheduler")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".agent-scheduler")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, falling back to defaults, then apply env overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::get_config_path()?)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir).with_context(|| {
                    format!("Failed to create config directory: {:?}", config_dir)
                })?;
                info!("Created config directory: {:?}", config_dir);
            }
        }

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    /// Overlay server settings from the environment. `lookup` is `std::env::var` outside tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = non_empty(ENV_URL) {
            debug!("Server url overridden by {}", ENV_URL);
            self.server.url = url;
        }
        if let Some(username) = non_empty(ENV_USERNAME) {
            debug!("Username overridden by {}", ENV_USERNAME);
            self.server.username = Some(username);
        }
        if let Some(password) = non_empty(ENV_PASSWORD) {
            self.server.password = Some(password);
        }
    }

    pub fn set_server(&mut self, url: String) -> Result<()> {
        let parsed = reqwest::Url::parse(&url).with_context(|| format!("Invalid server url: {}", url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("Server url must use http or https: {}", url);
        }
        info!("Setting server url to: {}", url);
        self.server.url = url;
        Ok(())
    }

    pub fn set_auth(&mut self, username: String, password: String) {
        info!("Setting basic auth for user: {}", username);
        self.server.username = Some(username);
        self.server.password = Some(password);
    }

    pub fn clear_auth(&mut self) {
        info!("Clearing basic auth");
        self.server.username = None;
        self.server.password = None;
    }
}
