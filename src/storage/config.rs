//! Configuration handling for tasklists
//!
//! Configuration is stored in `.tasklists/config.toml` (workspace) and
//! `~/.config/tasklists/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DEFAULT_LIST_COLOR, DEFAULT_LIST_NAME};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Workspace-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Name for lists created with `tl list new`
    pub default_list_name: String,

    /// Color for lists created with `tl list new`
    pub default_list_color: String,

    /// Show creation dates in task trees
    pub show_dates: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            default_list_name: DEFAULT_LIST_NAME.to_string(),
            default_list_color: DEFAULT_LIST_COLOR.to_string(),
            show_dates: false,
        }
    }
}

impl WorkspaceConfig {
    /// Rejects values the CLI cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_hex_color(&self.default_list_color) {
            return Err(ConfigError::Invalid(format!(
                "default_list_color must be a hex color like #21c8d8, got '{}'",
                self.default_list_color
            )));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// chrono format string for creation dates
    pub date_format: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Text,
            date_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Returns true for `#rgb` or `#rrggbb`
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Combined configuration (global + workspace)
#[derive(Debug, Clone)]
pub struct Config {
    pub workspace: WorkspaceConfig,
    pub global: GlobalConfig,
}

impl Config {
    /// Loads configuration for a specific workspace
    pub fn for_workspace(root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let workspace = Self::load_workspace_config(root)?;

        Ok(Self { workspace, global })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "tasklists", "tasklists")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads workspace configuration from a specific root
    fn load_workspace_config(root: &Path) -> Result<WorkspaceConfig> {
        let config_path = root.join(".tasklists").join("config.toml");

        if !config_path.exists() {
            return Ok(WorkspaceConfig::default());
        }

        let content = fs::read_to_string(&config_path).with_context(|| {
            format!("Failed to read workspace config: {}", config_path.display())
        })?;

        let config: WorkspaceConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse workspace config")?;
        config.validate()?;

        Ok(config)
    }

    /// Finds the workspace root by looking for a `.tasklists/` directory
    pub fn find_workspace_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(".tasklists").is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}
